// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger bootstrap for binaries and tests.

use anyhow::Context;
use env_logger::{Builder, Env};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs `env_logger` as the global logger, honoring `RUST_LOG` and
/// falling back to [`DEFAULT_FILTER`].
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(DEFAULT_FILTER)
}

/// Like [`init_logging`], with a custom fallback filter (e.g. `"vireo_lanes=debug"`).
///
/// Fails if a global logger is already installed.
pub fn init_logging_with(default_filter: &str) -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .try_init()
        .context("a global logger is already installed")?;
    log::debug!("Logging initialized (fallback filter '{default_filter}')");
    Ok(())
}
