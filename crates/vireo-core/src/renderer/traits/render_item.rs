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

use super::RenderContext;
use crate::math::{Aabb, Vec3};
use crate::renderer::api::scene::RenderOrderKey;
use crate::renderer::error::RenderError;

/// Something that can record its own draw commands.
///
/// Items are shared between stages and visibility managers as
/// `Arc<dyn RenderItem>`.
pub trait RenderItem: Send + Sync {
    /// Records this item's commands for `stage` into `context`.
    ///
    /// Errors propagate out of the stage unchanged.
    fn render(&self, context: &mut dyn RenderContext, stage: &str) -> Result<(), RenderError>;

    /// Names of the stages this item takes part in.
    fn stages(&self) -> &[&'static str];

    /// World-space bounds used for culling. Items without bounds are never culled.
    fn bounds(&self) -> Option<Aabb> {
        None
    }

    /// The key this item sorts by when seen from `view_position`.
    ///
    /// Defaults to an opaque key at the center of [`RenderItem::bounds`]
    /// (or the origin) with material 0.
    fn render_order_key(&self, view_position: Vec3) -> RenderOrderKey {
        let position = self.bounds().map_or(Vec3::ZERO, |b| b.center());
        RenderOrderKey::opaque(position, view_position, 0)
    }
}
