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

//! The target → visibility → sort → render cycle shared by every stage.

use vireo_core::math::{Frustum, Vec3};
use vireo_core::renderer::traits::with_context;
use vireo_core::renderer::{
    RenderComparer, RenderContext, RenderError, RenderQueue, StageState, VisibilityManager,
    WeakRenderContext,
};

/// Per-execution inputs of a stage cycle.
pub(crate) struct CycleParams<'a> {
    pub stage: &'a str,
    pub frustum: Option<&'a Frustum>,
    pub comparer: Option<RenderComparer>,
    pub view_position: Vec3,
}

/// The state a stage carries between frames: its queue storage and its cycle state.
#[derive(Debug)]
pub(crate) struct StageCycle {
    queue: RenderQueue,
    state: StageState,
    #[cfg(test)]
    history: Vec<StageState>,
}

impl StageCycle {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            queue: RenderQueue::with_capacity(queue_capacity),
            state: StageState::Idle,
            #[cfg(test)]
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    pub fn ensure_idle(&self, stage: &str, action: &str) -> Result<(), RenderError> {
        if self.state != StageState::Idle {
            return Err(RenderError::invalid_state(format!(
                "stage '{stage}' cannot {action} while {}",
                self.state
            )));
        }
        Ok(())
    }

    /// Runs one cycle against the context behind `context`.
    ///
    /// `bind_target` selects and prepares the render target; the cycle then
    /// sets viewport 0 to the full extent of whatever framebuffer is current.
    /// On success or failure the queue is emptied and the state returns to
    /// `Idle`.
    pub fn run(
        &mut self,
        context: &WeakRenderContext,
        visibility: &dyn VisibilityManager,
        params: CycleParams<'_>,
        bind_target: impl FnOnce(&mut dyn RenderContext) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        self.ensure_idle(params.stage, "execute")?;
        let result = with_context(context, |ctx| {
            self.run_locked(ctx, visibility, &params, bind_target)
        });
        self.queue.clear();
        self.enter(params.stage, StageState::Idle);
        if let Err(err) = &result {
            log::debug!("{}: cycle aborted: {err}", params.stage);
        }
        result
    }

    fn run_locked(
        &mut self,
        ctx: &mut dyn RenderContext,
        visibility: &dyn VisibilityManager,
        params: &CycleParams<'_>,
        bind_target: impl FnOnce(&mut dyn RenderContext) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let stage = params.stage;

        bind_target(&mut *ctx)?;
        match ctx.current_framebuffer() {
            Some(fb) => ctx.set_viewport(0.0, 0.0, fb.width as f32, fb.height as f32)?,
            None => log::warn!("{stage}: no framebuffer bound after target selection, viewport left unchanged"),
        }
        self.enter(stage, StageState::TargetBound);

        self.queue.clear();
        visibility.collect_visible_objects(
            &mut self.queue,
            stage,
            params.frustum,
            params.view_position,
        )?;
        self.enter(stage, StageState::VisibilityCollected);

        self.queue.sort(params.comparer);
        self.enter(stage, StageState::Sorted);

        for item in self.queue.items() {
            item.render(&mut *ctx, stage)?;
        }
        self.enter(stage, StageState::Rendered);

        log::debug!("{stage}: rendered {} item(s)", self.queue.len());
        Ok(())
    }

    fn enter(&mut self, stage: &str, state: StageState) {
        log::trace!("{stage}: {} -> {state}", self.state);
        self.state = state;
        #[cfg(test)]
        self.history.push(state);
    }
}
