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

use super::{SharedRenderContext, VisibilityManager};
use crate::math::Vec3;
use crate::renderer::error::RenderError;
use std::any::Any;
use std::fmt;

/// Where a stage is within one execution.
///
/// A stage moves `Idle → TargetBound → VisibilityCollected → Sorted →
/// Rendered` and back to `Idle` on every call to
/// [`PipelineStage::execute_stage`], including failed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageState {
    /// Between executions.
    #[default]
    Idle,
    /// The render target and viewport are set.
    TargetBound,
    /// The render queue holds this frame's visible items.
    VisibilityCollected,
    /// The render queue is in draw order.
    Sorted,
    /// Every item has been rendered.
    Rendered,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageState::Idle => "Idle",
            StageState::TargetBound => "TargetBound",
            StageState::VisibilityCollected => "VisibilityCollected",
            StageState::Sorted => "Sorted",
            StageState::Rendered => "Rendered",
        };
        f.write_str(name)
    }
}

/// One rendering pass, executed once per frame by a scheduler.
pub trait PipelineStage: Send {
    /// Stable name; items opt into this stage by listing it in [`RenderItem::stages`].
    ///
    /// [`RenderItem::stages`]: super::RenderItem::stages
    fn name(&self) -> &str;

    /// Whether the scheduler should run this stage.
    fn enabled(&self) -> bool;

    /// Turns the stage on or off.
    fn set_enabled(&mut self, enabled: bool);

    /// The current cycle state; [`StageState::Idle`] between executions.
    fn state(&self) -> StageState;

    /// Points the stage at a different rendering context. Only legal while idle.
    fn change_render_context(&mut self, context: &SharedRenderContext) -> Result<(), RenderError>;

    /// Runs one full cycle: bind target, collect visible items, sort, render.
    fn execute_stage(
        &mut self,
        visibility: &dyn VisibilityManager,
        view_position: Vec3,
    ) -> Result<(), RenderError>;

    /// Returns the stage as `Any`, for access to stage-specific settings.
    fn as_any(&self) -> &dyn Any;

    /// Returns the stage as mutable `Any`, for access to stage-specific settings.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
