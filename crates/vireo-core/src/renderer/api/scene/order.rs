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

use crate::math::Vec3;

/// The per-item sort key a [`RenderQueue`](super::RenderQueue) orders by.
///
/// Computed once per stage execution from the item position and the view position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOrderKey {
    /// Whether the item blends with what is behind it.
    pub translucent: bool,
    /// Squared distance from the view position.
    pub distance_sq: f32,
    /// Material or pipeline grouping key; equal keys share GPU state.
    pub material: u32,
}

impl RenderOrderKey {
    /// Key for an opaque item at `position` seen from `view_position`.
    pub fn opaque(position: Vec3, view_position: Vec3, material: u32) -> Self {
        Self {
            translucent: false,
            distance_sq: position.distance_squared(view_position),
            material,
        }
    }

    /// Key for a translucent item at `position` seen from `view_position`.
    pub fn translucent(position: Vec3, view_position: Vec3, material: u32) -> Self {
        Self {
            translucent: true,
            distance_sq: position.distance_squared(view_position),
            material,
        }
    }
}
