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

use crate::math::{Frustum, Vec3};
use crate::renderer::api::scene::RenderQueue;
use crate::renderer::error::RenderError;

/// Decides which render items a stage draws.
pub trait VisibilityManager {
    /// Adds to `queue` every item tagged for `stage` that may be visible
    /// through `frustum`, keyed from `view_position`.
    ///
    /// With no frustum nothing is culled. The queue is cleared by the caller.
    fn collect_visible_objects(
        &self,
        queue: &mut RenderQueue,
        stage: &str,
        frustum: Option<&Frustum>,
        view_position: Vec3,
    ) -> Result<(), RenderError>;
}
