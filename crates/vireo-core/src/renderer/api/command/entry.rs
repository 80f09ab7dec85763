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

//! The closed set of commands a [`CommandLog`](super::CommandLog) can hold.

use crate::math::LinearRgba;
use crate::renderer::api::resource::{
    FramebufferId, LayerRange, LoadOp, MipRange, Pipeline, PipelineStageFlags, StoreOp,
    TextureId, Viewport,
};
use std::fmt;

/// A reference to a debug label stored in the owning log's label arena.
///
/// Only valid for the log generation it was interned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelSpan {
    pub(crate) start: u32,
    pub(crate) len: u32,
    // Low bits of the log generation.
    pub(crate) generation: u32,
}

impl LabelSpan {
    /// Length of the label in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` for the empty label.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Parameters of a render pass start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassBegin {
    /// The framebuffer the pass renders into.
    pub framebuffer: FramebufferId,
    /// What happens to existing attachment contents.
    pub load: LoadOp,
    /// What happens to the results.
    pub store: StoreOp,
    /// Clear value for color attachments when `load` is [`LoadOp::Clear`].
    pub clear_color: LinearRgba,
    /// Clear value for the depth attachment when `load` is [`LoadOp::Clear`].
    pub clear_depth: f32,
}

/// Parameters of a non-indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawArgs {
    /// Number of vertices per instance.
    pub vertex_count: u32,
    /// Number of instances.
    pub instance_count: u32,
    /// First vertex.
    pub vertex_start: u32,
    /// First instance.
    pub instance_start: u32,
}

/// A synchronization point on a texture subresource range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureBarrier {
    /// The texture being synchronized.
    pub texture: TextureId,
    /// Affected mip levels.
    pub mips: MipRange,
    /// Affected array layers.
    pub layers: LayerRange,
    /// Stages whose work must complete first.
    pub src_stages: PipelineStageFlags,
    /// Stages that wait.
    pub dst_stages: PipelineStageFlags,
}

impl TextureBarrier {
    /// A barrier over every mip level and layer of `texture`.
    pub const fn full(
        texture: TextureId,
        src_stages: PipelineStageFlags,
        dst_stages: PipelineStageFlags,
    ) -> Self {
        Self {
            texture,
            mips: MipRange::ALL,
            layers: LayerRange::ALL,
            src_stages,
            dst_stages,
        }
    }
}

/// One recorded command.
///
/// Entries are plain `Copy` data: they carry handles, never resources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandEntry {
    /// Starts a render pass on a framebuffer.
    BeginRenderPass(RenderPassBegin),
    /// Sets one viewport slot.
    SetViewport {
        /// Viewport slot.
        index: u32,
        /// The rectangle and depth range.
        viewport: Viewport,
    },
    /// Clears one color attachment of the bound framebuffer.
    ClearColorTarget {
        /// Color attachment index.
        index: u32,
        /// Clear value.
        color: LinearRgba,
    },
    /// Clears the depth/stencil attachment of the bound framebuffer.
    ClearDepthStencil {
        /// Depth clear value.
        depth: f32,
        /// Stencil clear value.
        stencil: u8,
    },
    /// Binds a pipeline to its bind point.
    SetPipeline(Pipeline),
    /// Binds a framebuffer.
    SetFramebuffer(FramebufferId),
    /// A non-indexed draw.
    Draw(DrawArgs),
    /// A compute dispatch with the given group counts.
    Dispatch {
        /// Groups along X.
        x: u32,
        /// Groups along Y.
        y: u32,
        /// Groups along Z.
        z: u32,
    },
    /// A texture memory barrier.
    MemoryBarrier(TextureBarrier),
    /// Regenerates the mip chain of a texture from its top level.
    GenerateMipmaps(TextureId),
    /// Opens a named debug scope.
    PushDebugGroup(LabelSpan),
    /// Closes the innermost debug scope.
    PopDebugGroup,
    /// Inserts a single named debug marker.
    InsertDebugMarker(LabelSpan),
}

/// The discriminant of a [`CommandEntry`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CommandKind {
    BeginRenderPass,
    SetViewport,
    ClearColorTarget,
    ClearDepthStencil,
    SetPipeline,
    SetFramebuffer,
    Draw,
    Dispatch,
    MemoryBarrier,
    GenerateMipmaps,
    PushDebugGroup,
    PopDebugGroup,
    InsertDebugMarker,
}

impl CommandKind {
    /// A stable human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::BeginRenderPass => "BeginRenderPass",
            CommandKind::SetViewport => "SetViewport",
            CommandKind::ClearColorTarget => "ClearColorTarget",
            CommandKind::ClearDepthStencil => "ClearDepthStencil",
            CommandKind::SetPipeline => "SetPipeline",
            CommandKind::SetFramebuffer => "SetFramebuffer",
            CommandKind::Draw => "Draw",
            CommandKind::Dispatch => "Dispatch",
            CommandKind::MemoryBarrier => "MemoryBarrier",
            CommandKind::GenerateMipmaps => "GenerateMipmaps",
            CommandKind::PushDebugGroup => "PushDebugGroup",
            CommandKind::PopDebugGroup => "PopDebugGroup",
            CommandKind::InsertDebugMarker => "InsertDebugMarker",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CommandEntry {
    /// The kind of this entry.
    pub const fn kind(&self) -> CommandKind {
        match self {
            CommandEntry::BeginRenderPass(_) => CommandKind::BeginRenderPass,
            CommandEntry::SetViewport { .. } => CommandKind::SetViewport,
            CommandEntry::ClearColorTarget { .. } => CommandKind::ClearColorTarget,
            CommandEntry::ClearDepthStencil { .. } => CommandKind::ClearDepthStencil,
            CommandEntry::SetPipeline(_) => CommandKind::SetPipeline,
            CommandEntry::SetFramebuffer(_) => CommandKind::SetFramebuffer,
            CommandEntry::Draw(_) => CommandKind::Draw,
            CommandEntry::Dispatch { .. } => CommandKind::Dispatch,
            CommandEntry::MemoryBarrier(_) => CommandKind::MemoryBarrier,
            CommandEntry::GenerateMipmaps(_) => CommandKind::GenerateMipmaps,
            CommandEntry::PushDebugGroup(_) => CommandKind::PushDebugGroup,
            CommandEntry::PopDebugGroup => CommandKind::PopDebugGroup,
            CommandEntry::InsertDebugMarker(_) => CommandKind::InsertDebugMarker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_stay_small() {
        // Entries live contiguously in a Vec; keep them within a cache line.
        assert!(std::mem::size_of::<CommandEntry>() <= 64);
    }

    #[test]
    fn kind_matches_variant() {
        let entry = CommandEntry::Dispatch { x: 1, y: 1, z: 1 };
        assert_eq!(entry.kind(), CommandKind::Dispatch);
        assert_eq!(CommandEntry::PopDebugGroup.kind().to_string(), "PopDebugGroup");
    }
}
