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

//! The general-purpose pipeline stage.

use super::cycle::{CycleParams, StageCycle};
use std::any::Any;
use std::sync::Arc;
use vireo_core::math::{Frustum, Vec3};
use vireo_core::renderer::{
    Framebuffer, PipelineStage, RenderComparer, RenderError, RenderQueue, RenderSettings,
    SharedRenderContext, StageState, VisibilityManager, WeakRenderContext,
};

/// Name of the main scene stage.
pub const STANDARD_STAGE: &str = "Standard";

/// A stage that draws every visible item tagged with its name.
///
/// Each execution binds the override framebuffer (or the context's default
/// one), sets a full-size viewport, collects the items visible through the
/// stage frustum, sorts them, and lets each record itself.
///
/// The frustum, override target and comparer are meant to be updated by the
/// caller between frames. Nothing else carries over from one execution to
/// the next except the queue's storage.
#[derive(Debug)]
pub struct StandardPipelineStage {
    name: String,
    enabled: bool,
    context: WeakRenderContext,
    override_framebuffer: Option<Framebuffer>,
    frustum: Option<Frustum>,
    comparer: Option<RenderComparer>,
    cycle: StageCycle,
}

impl StandardPipelineStage {
    /// Creates an enabled stage named `name` rendering into `context`.
    pub fn new(name: impl Into<String>, context: &SharedRenderContext) -> Self {
        Self::with_settings(name, context, &RenderSettings::default())
    }

    /// Like [`StandardPipelineStage::new`], sizing the queue from `settings`.
    pub fn with_settings(
        name: impl Into<String>,
        context: &SharedRenderContext,
        settings: &RenderSettings,
    ) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            context: Arc::downgrade(context),
            override_framebuffer: None,
            frustum: None,
            comparer: None,
            cycle: StageCycle::new(settings.queue_capacity),
        }
    }

    /// Renders into `framebuffer` instead of the default one. `None` restores the default.
    pub fn set_override_framebuffer(&mut self, framebuffer: Option<Framebuffer>) {
        self.override_framebuffer = framebuffer;
    }

    /// The framebuffer used instead of the default one, if any.
    pub fn override_framebuffer(&self) -> Option<&Framebuffer> {
        self.override_framebuffer.as_ref()
    }

    /// Sets the camera frustum used for culling. `None` disables culling.
    pub fn set_frustum(&mut self, frustum: Option<Frustum>) {
        self.frustum = frustum;
    }

    /// The camera frustum used for culling.
    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Replaces the default draw order. `None` restores it.
    pub fn set_comparer(&mut self, comparer: Option<RenderComparer>) {
        self.comparer = comparer;
    }

    /// The render queue; empty between executions.
    pub fn queue(&self) -> &RenderQueue {
        self.cycle.queue()
    }
}

impl PipelineStage for StandardPipelineStage {
    fn name(&self) -> &str {
        &self.name
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
        self.cycle.ensure_idle(&self.name, "change its render context")?;
        self.context = Arc::downgrade(context);
        Ok(())
    }

    fn execute_stage(
        &mut self,
        visibility: &dyn VisibilityManager,
        view_position: Vec3,
    ) -> Result<(), RenderError> {
        let params = CycleParams {
            stage: &self.name,
            frustum: self.frustum.as_ref(),
            comparer: self.comparer,
            view_position,
        };
        let target = self.override_framebuffer;
        self.cycle
            .run(&self.context, visibility, params, |ctx| match target {
                Some(framebuffer) => ctx.set_framebuffer(&framebuffer),
                None => ctx.set_default_framebuffer(),
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
