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

//! Runs pipeline stages in order, once per frame.

use vireo_core::math::Vec3;
use vireo_core::renderer::{
    PipelineStage, RenderError, SharedRenderContext, StageState, VisibilityManager,
};

/// An ordered list of pipeline stages sharing one rendering context.
///
/// [`Renderer::render_frame`] runs every enabled stage in insertion order and
/// stops at the first error. Disabled stages are skipped entirely.
pub struct Renderer {
    context: SharedRenderContext,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Renderer {
    /// Creates a renderer with no stages.
    pub fn new(context: SharedRenderContext) -> Self {
        Self {
            context,
            stages: Vec::new(),
        }
    }

    /// Appends a stage; it runs after every stage already added.
    pub fn add_stage(&mut self, stage: Box<dyn PipelineStage>) {
        log::debug!("Renderer: added stage '{}'", stage.name());
        if self.stage(stage.name()).is_some() {
            log::warn!(
                "Renderer: stage name '{}' is already in use; lookups by name return the first",
                stage.name()
            );
        }
        self.stages.push(stage);
    }

    /// Builder-style [`Renderer::add_stage`].
    pub fn with_stage(mut self, stage: impl PipelineStage + 'static) -> Self {
        self.add_stage(Box::new(stage));
        self
    }

    /// The stages, in execution order.
    pub fn stages(&self) -> &[Box<dyn PipelineStage>] {
        &self.stages
    }

    /// The first stage named `name`.
    pub fn stage(&self, name: &str) -> Option<&(dyn PipelineStage + 'static)> {
        self.stages
            .iter()
            .find(|stage| stage.name() == name)
            .map(|stage| &**stage)
    }

    /// The first stage named `name`, mutably.
    pub fn stage_mut(&mut self, name: &str) -> Option<&mut (dyn PipelineStage + 'static)> {
        self.stages
            .iter_mut()
            .find(|stage| stage.name() == name)
            .map(|stage| &mut **stage)
    }

    /// The first stage named `name`, if it is a `T`.
    pub fn stage_as_mut<T: PipelineStage + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.stage_mut(name)?.as_any_mut().downcast_mut::<T>()
    }

    /// The context every stage renders into.
    pub fn context(&self) -> &SharedRenderContext {
        &self.context
    }

    /// Points the renderer and every stage at `context`.
    ///
    /// Fails without changing anything if a stage is mid-cycle.
    pub fn change_render_context(&mut self, context: SharedRenderContext) -> Result<(), RenderError> {
        for stage in &self.stages {
            if stage.state() != StageState::Idle {
                return Err(RenderError::invalid_state(format!(
                    "stage '{}' is mid-cycle ({})",
                    stage.name(),
                    stage.state()
                )));
            }
        }
        for stage in &mut self.stages {
            stage.change_render_context(&context)?;
        }
        self.context = context;
        log::info!("Renderer: render context changed for {} stage(s)", self.stages.len());
        Ok(())
    }

    /// Executes every enabled stage in order.
    pub fn render_frame(
        &mut self,
        visibility: &dyn VisibilityManager,
        view_position: Vec3,
    ) -> Result<(), RenderError> {
        for stage in self.stages.iter_mut().filter(|stage| stage.enabled()) {
            stage.execute_stage(visibility, view_position)?;
        }
        Ok(())
    }
}
