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

//! Resource handles and the small descriptors the recorder validates against.
//!
//! Handles are opaque `Copy` identifiers. Command entries only ever carry
//! handles; the resources themselves live in whatever backend executes them.

use bitflags::bitflags;

/// An opaque handle to a framebuffer (a set of color targets plus an optional depth target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramebufferId(pub u64);

/// An opaque handle to a graphics or compute pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub u64);

/// An opaque handle to a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Describes a framebuffer as far as recording is concerned.
///
/// Equality is by handle: two descriptors with the same `id` denote the same
/// binding, so this is what the change tracker compares.
#[derive(Debug, Clone, Copy)]
pub struct Framebuffer {
    /// The backend handle.
    pub id: FramebufferId,
    /// Width of every attachment, in pixels.
    pub width: u32,
    /// Height of every attachment, in pixels.
    pub height: u32,
    /// Number of color attachments.
    pub color_target_count: u32,
    /// Whether a depth/stencil attachment is present.
    pub has_depth: bool,
}

impl Framebuffer {
    /// A framebuffer with `color_target_count` color targets and no depth target.
    pub const fn color(id: FramebufferId, width: u32, height: u32, color_target_count: u32) -> Self {
        Self {
            id,
            width,
            height,
            color_target_count,
            has_depth: false,
        }
    }

    /// A depth-only framebuffer, as used for shadow maps.
    pub const fn depth_only(id: FramebufferId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            color_target_count: 0,
            has_depth: true,
        }
    }

    /// Builder-style toggle for the depth attachment.
    pub const fn with_depth(mut self, has_depth: bool) -> Self {
        self.has_depth = has_depth;
        self
    }

    /// A viewport covering the whole framebuffer with the `[0, 1]` depth range.
    pub fn full_viewport(&self) -> Viewport {
        Viewport::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

impl PartialEq for Framebuffer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Framebuffer {}

/// Which bind point a pipeline occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Rasterization pipeline, consumed by draws.
    Graphics,
    /// Compute pipeline, consumed by dispatches.
    Compute,
}

/// A pipeline handle tagged with its bind point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pipeline {
    /// The backend handle.
    pub id: PipelineId,
    /// The bind point.
    pub kind: PipelineKind,
}

impl Pipeline {
    /// A graphics pipeline.
    pub const fn graphics(id: PipelineId) -> Self {
        Self {
            id,
            kind: PipelineKind::Graphics,
        }
    }

    /// A compute pipeline.
    pub const fn compute(id: PipelineId) -> Self {
        Self {
            id,
            kind: PipelineKind::Compute,
        }
    }

    /// Returns `true` for compute pipelines.
    pub fn is_compute(&self) -> bool {
        self.kind == PipelineKind::Compute
    }
}

/// A viewport rectangle with its depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge, in pixels.
    pub x: f32,
    /// Top edge, in pixels.
    pub y: f32,
    /// Width, in pixels.
    pub width: f32,
    /// Height, in pixels.
    pub height: f32,
    /// Near end of the depth range.
    pub min_depth: f32,
    /// Far end of the depth range.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport with the `[0, 1]` depth range.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

bitflags! {
    /// Pipeline stages a memory barrier synchronizes between.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStageFlags: u32 {
        /// Start of the pipeline; nothing has executed yet.
        const TOP_OF_PIPE = 1 << 0;
        /// Vertex shading.
        const VERTEX = 1 << 1;
        /// Fragment shading.
        const FRAGMENT = 1 << 2;
        /// Color attachment writes.
        const COLOR_OUTPUT = 1 << 3;
        /// Compute shading.
        const COMPUTE = 1 << 4;
        /// Copies, blits and mip generation.
        const TRANSFER = 1 << 5;
        /// End of the pipeline; everything has executed.
        const BOTTOM_OF_PIPE = 1 << 6;
        /// Every stage.
        const ALL = Self::TOP_OF_PIPE.bits()
            | Self::VERTEX.bits()
            | Self::FRAGMENT.bits()
            | Self::COLOR_OUTPUT.bits()
            | Self::COMPUTE.bits()
            | Self::TRANSFER.bits()
            | Self::BOTTOM_OF_PIPE.bits();
    }
}

/// A range of mip levels. `count == u32::MAX` means "to the last level".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MipRange {
    /// First level.
    pub base: u32,
    /// Number of levels.
    pub count: u32,
}

impl MipRange {
    /// Every mip level of the texture.
    pub const ALL: Self = Self {
        base: 0,
        count: u32::MAX,
    };

    /// A single mip level.
    pub const fn level(level: u32) -> Self {
        Self {
            base: level,
            count: 1,
        }
    }
}

/// A range of array layers. `count == u32::MAX` means "to the last layer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerRange {
    /// First layer.
    pub base: u32,
    /// Number of layers.
    pub count: u32,
}

impl LayerRange {
    /// Every array layer of the texture.
    pub const ALL: Self = Self {
        base: 0,
        count: u32::MAX,
    };

    /// A single layer.
    pub const fn layer(layer: u32) -> Self {
        Self {
            base: layer,
            count: 1,
        }
    }
}

/// What to do with an attachment's contents when a render pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadOp {
    /// Keep the existing contents.
    Load,
    /// Overwrite with the pass clear value.
    #[default]
    Clear,
    /// Contents are undefined.
    DontCare,
}

/// What to do with an attachment's contents when a render pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreOp {
    /// Write the results back.
    #[default]
    Store,
    /// Results may be discarded.
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framebuffer_equality_is_by_handle() {
        let a = Framebuffer::color(FramebufferId(1), 800, 600, 1);
        let resized = Framebuffer::color(FramebufferId(1), 1024, 768, 2);
        let other = Framebuffer::color(FramebufferId(2), 800, 600, 1);
        assert_eq!(a, resized);
        assert_ne!(a, other);
    }

    #[test]
    fn full_viewport_covers_framebuffer() {
        let fb = Framebuffer::depth_only(FramebufferId(3), 2048, 2048);
        assert_eq!(fb.full_viewport(), Viewport::new(0.0, 0.0, 2048.0, 2048.0));
        assert_eq!(fb.color_target_count, 0);
        assert!(fb.has_depth);
    }

    #[test]
    fn stage_flags_all_contains_transfer() {
        assert!(PipelineStageFlags::ALL.contains(PipelineStageFlags::TRANSFER));
        assert!(!PipelineStageFlags::FRAGMENT.intersects(PipelineStageFlags::TRANSFER));
    }
}
