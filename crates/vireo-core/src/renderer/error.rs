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

//! Defines the error type shared by every rendering operation.

use std::error::Error;
use std::fmt;

/// An error raised while recording, sorting, executing or replaying rendering work.
///
/// Errors are surfaced to the caller as-is. Nothing in the rendering path retries
/// or swallows them; the only local no-op is the redundant state-change skip.
#[derive(Debug)]
pub enum RenderError {
    /// The operation is not legal in the current state (e.g. appending to a
    /// sealed command log, drawing without a pipeline, re-entering a stage).
    InvalidState(String),
    /// A resource does not match what the operation needs (e.g. clearing a
    /// color target index beyond the framebuffer's attachment count).
    ResourceMismatch(String),
    /// The executing backend cannot perform this kind of command.
    UnsupportedOperation(String),
    /// A render item failed for its own reasons.
    ItemFailed(Box<dyn Error + Send + Sync>),
}

impl RenderError {
    /// Shorthand for [`RenderError::InvalidState`].
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        RenderError::InvalidState(msg.into())
    }

    /// Shorthand for [`RenderError::ResourceMismatch`].
    pub fn resource_mismatch(msg: impl Into<String>) -> Self {
        RenderError::ResourceMismatch(msg.into())
    }

    /// Shorthand for [`RenderError::UnsupportedOperation`].
    pub fn unsupported(msg: impl Into<String>) -> Self {
        RenderError::UnsupportedOperation(msg.into())
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidState(msg) => write!(f, "Invalid render state: {msg}"),
            RenderError::ResourceMismatch(msg) => write!(f, "Resource mismatch: {msg}"),
            RenderError::UnsupportedOperation(msg) => {
                write!(f, "Unsupported operation: {msg}")
            }
            RenderError::ItemFailed(err) => write!(f, "Render item failed: {err}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::ItemFailed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MeshMissing;

    impl fmt::Display for MeshMissing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "mesh missing")
        }
    }

    impl Error for MeshMissing {}

    #[test]
    fn display_includes_message() {
        let err = RenderError::invalid_state("log is sealed");
        assert_eq!(err.to_string(), "Invalid render state: log is sealed");
        assert!(err.source().is_none());
    }

    #[test]
    fn item_failure_exposes_source() {
        let err = RenderError::ItemFailed(Box::new(MeshMissing));
        assert_eq!(err.to_string(), "Render item failed: mesh missing");
        assert!(err.source().is_some());
    }
}
