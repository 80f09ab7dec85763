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

use vireo_core::renderer::{CommandKind, RenderError};

/// Optional features a backend may lack.
///
/// Commands needing a missing feature are rejected with
/// [`RenderError::UnsupportedOperation`] when replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendCapabilities {
    /// Compute pipelines and dispatches.
    pub compute: bool,
    /// Debug groups and markers.
    pub debug_markers: bool,
    /// GPU-side mip chain generation.
    pub mipmap_generation: bool,
}

impl BackendCapabilities {
    /// Every optional feature available.
    pub const FULL: Self = Self {
        compute: true,
        debug_markers: true,
        mipmap_generation: true,
    };

    /// No optional feature, as on the oldest targets.
    pub const MINIMAL: Self = Self {
        compute: false,
        debug_markers: false,
        mipmap_generation: false,
    };

    /// Returns `true` if commands of `kind` can run.
    pub fn supports(&self, kind: CommandKind) -> bool {
        match kind {
            CommandKind::Dispatch => self.compute,
            CommandKind::PushDebugGroup
            | CommandKind::PopDebugGroup
            | CommandKind::InsertDebugMarker => self.debug_markers,
            CommandKind::GenerateMipmaps => self.mipmap_generation,
            _ => true,
        }
    }

    /// Fails with [`RenderError::UnsupportedOperation`] unless `kind` is supported.
    pub fn check(&self, kind: CommandKind) -> Result<(), RenderError> {
        if self.supports(kind) {
            Ok(())
        } else {
            Err(RenderError::unsupported(format!(
                "{kind} is not supported by this backend"
            )))
        }
    }
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_rejects_optional_kinds_only() {
        let caps = BackendCapabilities::MINIMAL;
        assert!(caps.supports(CommandKind::Draw));
        assert!(caps.supports(CommandKind::MemoryBarrier));
        assert!(!caps.supports(CommandKind::Dispatch));
        assert!(!caps.supports(CommandKind::InsertDebugMarker));
        assert!(matches!(
            caps.check(CommandKind::GenerateMipmaps),
            Err(RenderError::UnsupportedOperation(_))
        ));
    }
}
