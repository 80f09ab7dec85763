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

//! Defines the contracts between stages, items, visibility and backends.
//!
//! - [`RenderContext`]: what a stage or an item can do to the frame being recorded.
//! - [`RenderItem`]: something that can draw itself into one or more stages.
//! - [`VisibilityManager`]: decides which items a stage sees.
//! - [`PipelineStage`]: one rendering pass, run once per frame.
//! - [`CommandExecutor`]: a backend replaying recorded commands.

mod executor;
mod pipeline_stage;
mod render_context;
mod render_item;
mod visibility;

pub use self::executor::CommandExecutor;
pub use self::pipeline_stage::{PipelineStage, StageState};
pub use self::render_context::{with_context, RenderContext, SharedRenderContext, WeakRenderContext};
pub use self::render_item::RenderItem;
pub use self::visibility::VisibilityManager;
