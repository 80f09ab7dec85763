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

//! A depth-only stage rendering shadow casters from a light's point of view.

use super::cycle::{CycleParams, StageCycle};
use std::any::Any;
use std::sync::Arc;
use vireo_core::math::{Frustum, Vec3};
use vireo_core::renderer::{
    Framebuffer, FramebufferId, PipelineStage, RenderError, RenderQueue, RenderSettings,
    SharedRenderContext, StageState, VisibilityManager, WeakRenderContext,
};

/// Name of the shadow map stage; items opt in by listing it.
pub const SHADOW_MAP_STAGE: &str = "ShadowMap";

/// Width and height of the shadow map when none is given.
pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 2048;

/// Renders shadow casters into a stage-owned depth framebuffer.
///
/// Every execution binds the depth framebuffer, clears its depth, sets the
/// viewport to the map size and then renders the items tagged
/// [`SHADOW_MAP_STAGE`], sorted by distance from the light.
#[derive(Debug)]
pub struct ShadowMapStage {
    enabled: bool,
    context: WeakRenderContext,
    framebuffer: Framebuffer,
    light_position: Vec3,
    light_frustum: Option<Frustum>,
    cycle: StageCycle,
}

impl ShadowMapStage {
    /// Creates a stage rendering into a square depth map of
    /// [`DEFAULT_SHADOW_MAP_SIZE`] identified by `framebuffer`.
    pub fn new(context: &SharedRenderContext, framebuffer: FramebufferId) -> Self {
        Self::with_size(
            context,
            framebuffer,
            DEFAULT_SHADOW_MAP_SIZE,
            DEFAULT_SHADOW_MAP_SIZE,
            &RenderSettings::default(),
        )
    }

    /// Creates a stage with an explicit shadow map size.
    pub fn with_size(
        context: &SharedRenderContext,
        framebuffer: FramebufferId,
        width: u32,
        height: u32,
        settings: &RenderSettings,
    ) -> Self {
        Self {
            enabled: true,
            context: Arc::downgrade(context),
            framebuffer: Framebuffer::depth_only(framebuffer, width, height),
            light_position: Vec3::ZERO,
            light_frustum: None,
            cycle: StageCycle::new(settings.queue_capacity),
        }
    }

    /// The depth framebuffer this stage renders into.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Sets the position items are sorted against.
    pub fn set_light_position(&mut self, position: Vec3) {
        self.light_position = position;
    }

    /// The position items are sorted against.
    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    /// Sets the light's view volume used for culling casters. `None` disables culling.
    pub fn set_light_frustum(&mut self, frustum: Option<Frustum>) {
        self.light_frustum = frustum;
    }

    /// The render queue; empty between executions.
    pub fn queue(&self) -> &RenderQueue {
        self.cycle.queue()
    }
}

impl PipelineStage for ShadowMapStage {
    fn name(&self) -> &str {
        SHADOW_MAP_STAGE
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn state(&self) -> StageState {
        self.cycle.state()
    }

    fn change_render_context(&mut self, context: &SharedRenderContext) -> Result<(), RenderError> {
        self.cycle
            .ensure_idle(SHADOW_MAP_STAGE, "change its render context")?;
        self.context = Arc::downgrade(context);
        Ok(())
    }

    /// Runs the shadow pass. `view_position` is ignored: casters are sorted
    /// by distance from [`ShadowMapStage::light_position`].
    fn execute_stage(
        &mut self,
        visibility: &dyn VisibilityManager,
        _view_position: Vec3,
    ) -> Result<(), RenderError> {
        let params = CycleParams {
            stage: SHADOW_MAP_STAGE,
            frustum: self.light_frustum.as_ref(),
            comparer: None,
            view_position: self.light_position,
        };
        let framebuffer = self.framebuffer;
        self.cycle
            .run(&self.context, visibility, params, |ctx| {
                ctx.set_framebuffer(&framebuffer)?;
                ctx.recorder().clear_depth_stencil(1.0, 0)
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
