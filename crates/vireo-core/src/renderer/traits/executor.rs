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

use crate::math::LinearRgba;
use crate::renderer::api::command::{DrawArgs, RenderPassBegin, TextureBarrier};
use crate::renderer::api::resource::{FramebufferId, Pipeline, TextureId, Viewport};
use crate::renderer::error::RenderError;

/// A backend that turns recorded commands into real graphics-API calls.
///
/// [`CommandLog::replay`](crate::renderer::api::command::CommandLog::replay)
/// calls exactly one method per entry, in recording order. Returning an error
/// stops the replay and the error reaches the caller unchanged; a backend
/// that cannot perform a command kind should return
/// [`RenderError::UnsupportedOperation`].
pub trait CommandExecutor {
    /// Starts a render pass.
    fn begin_render_pass(&mut self, pass: &RenderPassBegin) -> Result<(), RenderError>;

    /// Sets one viewport slot.
    fn set_viewport(&mut self, index: u32, viewport: &Viewport) -> Result<(), RenderError>;

    /// Clears one color attachment of the bound framebuffer.
    fn clear_color_target(&mut self, index: u32, color: LinearRgba) -> Result<(), RenderError>;

    /// Clears the depth/stencil attachment of the bound framebuffer.
    fn clear_depth_stencil(&mut self, depth: f32, stencil: u8) -> Result<(), RenderError>;

    /// Binds a pipeline.
    fn set_pipeline(&mut self, pipeline: Pipeline) -> Result<(), RenderError>;

    /// Binds a framebuffer.
    fn set_framebuffer(&mut self, framebuffer: FramebufferId) -> Result<(), RenderError>;

    /// Issues a non-indexed draw.
    fn draw(&mut self, args: &DrawArgs) -> Result<(), RenderError>;

    /// Issues a compute dispatch.
    fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Result<(), RenderError>;

    /// Inserts a texture memory barrier.
    fn memory_barrier(&mut self, barrier: &TextureBarrier) -> Result<(), RenderError>;

    /// Regenerates a texture's mip chain.
    fn generate_mipmaps(&mut self, texture: TextureId) -> Result<(), RenderError>;

    /// Opens a debug scope.
    fn push_debug_group(&mut self, label: &str) -> Result<(), RenderError>;

    /// Closes the innermost debug scope.
    fn pop_debug_group(&mut self) -> Result<(), RenderError>;

    /// Inserts a single debug marker.
    fn insert_debug_marker(&mut self, label: &str) -> Result<(), RenderError>;
}
