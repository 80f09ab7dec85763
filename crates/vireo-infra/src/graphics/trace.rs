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

//! An executor that records what a backend would have been asked to do.

use super::BackendCapabilities;
use vireo_core::math::LinearRgba;
use vireo_core::renderer::{
    CommandExecutor, CommandKind, DrawArgs, FramebufferId, Pipeline, RenderError,
    RenderPassBegin, TextureBarrier, TextureId, Viewport,
};

/// One call received by a [`TraceExecutor`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum TraceCall {
    BeginRenderPass(RenderPassBegin),
    SetViewport { index: u32, viewport: Viewport },
    ClearColorTarget { index: u32, color: LinearRgba },
    ClearDepthStencil { depth: f32, stencil: u8 },
    SetPipeline(Pipeline),
    SetFramebuffer(FramebufferId),
    Draw(DrawArgs),
    Dispatch { x: u32, y: u32, z: u32 },
    MemoryBarrier(TextureBarrier),
    GenerateMipmaps(TextureId),
    PushDebugGroup(String),
    PopDebugGroup,
    InsertDebugMarker(String),
}

impl TraceCall {
    /// The command kind this call corresponds to.
    pub fn kind(&self) -> CommandKind {
        match self {
            TraceCall::BeginRenderPass(_) => CommandKind::BeginRenderPass,
            TraceCall::SetViewport { .. } => CommandKind::SetViewport,
            TraceCall::ClearColorTarget { .. } => CommandKind::ClearColorTarget,
            TraceCall::ClearDepthStencil { .. } => CommandKind::ClearDepthStencil,
            TraceCall::SetPipeline(_) => CommandKind::SetPipeline,
            TraceCall::SetFramebuffer(_) => CommandKind::SetFramebuffer,
            TraceCall::Draw(_) => CommandKind::Draw,
            TraceCall::Dispatch { .. } => CommandKind::Dispatch,
            TraceCall::MemoryBarrier(_) => CommandKind::MemoryBarrier,
            TraceCall::GenerateMipmaps(_) => CommandKind::GenerateMipmaps,
            TraceCall::PushDebugGroup(_) => CommandKind::PushDebugGroup,
            TraceCall::PopDebugGroup => CommandKind::PopDebugGroup,
            TraceCall::InsertDebugMarker(_) => CommandKind::InsertDebugMarker,
        }
    }
}

/// A [`CommandExecutor`] with no GPU behind it.
///
/// Every call is checked against the configured [`BackendCapabilities`],
/// logged at trace level and appended to [`TraceExecutor::calls`]. Useful for
/// tests, headless runs and inspecting what a frame actually submits.
#[derive(Debug, Default)]
pub struct TraceExecutor {
    capabilities: BackendCapabilities,
    calls: Vec<TraceCall>,
    debug_depth: u32,
}

impl TraceExecutor {
    /// Creates an executor supporting every optional feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor limited to `capabilities`.
    pub fn with_capabilities(capabilities: BackendCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// The capabilities calls are checked against.
    pub fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[TraceCall] {
        &self.calls
    }

    /// The kinds of every call received so far, in order.
    pub fn kinds(&self) -> Vec<CommandKind> {
        self.calls.iter().map(TraceCall::kind).collect()
    }

    /// Forgets the recorded calls, e.g. between frames.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.debug_depth = 0;
    }

    fn accept(&mut self, call: TraceCall) -> Result<(), RenderError> {
        self.capabilities.check(call.kind())?;
        log::trace!("TraceExecutor: {call:?}");
        self.calls.push(call);
        Ok(())
    }
}

impl CommandExecutor for TraceExecutor {
    fn begin_render_pass(&mut self, pass: &RenderPassBegin) -> Result<(), RenderError> {
        self.accept(TraceCall::BeginRenderPass(*pass))
    }

    fn set_viewport(&mut self, index: u32, viewport: &Viewport) -> Result<(), RenderError> {
        self.accept(TraceCall::SetViewport {
            index,
            viewport: *viewport,
        })
    }

    fn clear_color_target(&mut self, index: u32, color: LinearRgba) -> Result<(), RenderError> {
        self.accept(TraceCall::ClearColorTarget { index, color })
    }

    fn clear_depth_stencil(&mut self, depth: f32, stencil: u8) -> Result<(), RenderError> {
        self.accept(TraceCall::ClearDepthStencil { depth, stencil })
    }

    fn set_pipeline(&mut self, pipeline: Pipeline) -> Result<(), RenderError> {
        if pipeline.is_compute() {
            self.capabilities.check(CommandKind::Dispatch)?;
        }
        self.accept(TraceCall::SetPipeline(pipeline))
    }

    fn set_framebuffer(&mut self, framebuffer: FramebufferId) -> Result<(), RenderError> {
        self.accept(TraceCall::SetFramebuffer(framebuffer))
    }

    fn draw(&mut self, args: &DrawArgs) -> Result<(), RenderError> {
        self.accept(TraceCall::Draw(*args))
    }

    fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Result<(), RenderError> {
        self.accept(TraceCall::Dispatch { x, y, z })
    }

    fn memory_barrier(&mut self, barrier: &TextureBarrier) -> Result<(), RenderError> {
        self.accept(TraceCall::MemoryBarrier(*barrier))
    }

    fn generate_mipmaps(&mut self, texture: TextureId) -> Result<(), RenderError> {
        self.accept(TraceCall::GenerateMipmaps(texture))
    }

    fn push_debug_group(&mut self, label: &str) -> Result<(), RenderError> {
        self.accept(TraceCall::PushDebugGroup(label.to_owned()))?;
        self.debug_depth += 1;
        Ok(())
    }

    fn pop_debug_group(&mut self) -> Result<(), RenderError> {
        self.capabilities.check(CommandKind::PopDebugGroup)?;
        if self.debug_depth == 0 {
            return Err(RenderError::invalid_state(
                "TraceExecutor: debug group popped with none open",
            ));
        }
        self.accept(TraceCall::PopDebugGroup)?;
        self.debug_depth -= 1;
        Ok(())
    }

    fn insert_debug_marker(&mut self, label: &str) -> Result<(), RenderError> {
        self.accept(TraceCall::InsertDebugMarker(label.to_owned()))
    }
}
