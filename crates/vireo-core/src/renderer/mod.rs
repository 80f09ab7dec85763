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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module is the "common language" between the stages that decide what
//! to draw and the backends that draw it. Stages and render items talk to a
//! [`RenderContext`], which records into a [`CommandLog`]; a
//! [`CommandExecutor`] implementation later replays that log against a real
//! graphics API.

pub mod api;
pub mod context;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::context::RecordingContext;
pub use self::error::RenderError;
pub use self::traits::{
    CommandExecutor, PipelineStage, RenderContext, RenderItem, SharedRenderContext, StageState,
    VisibilityManager, WeakRenderContext,
};
