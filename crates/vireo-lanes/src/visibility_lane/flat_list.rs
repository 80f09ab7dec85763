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

use ahash::{AHashMap, AHashSet};
use std::sync::Arc;
use vireo_core::math::{Frustum, Vec3};
use vireo_core::renderer::{RenderError, RenderItem, RenderQueue, VisibilityManager};

/// Identity of a shared item: the address of its allocation.
fn item_key(item: &Arc<dyn RenderItem>) -> usize {
    Arc::as_ptr(item) as *const () as usize
}

/// A visibility manager that keeps plain per-stage lists of items.
///
/// Items are registered once and filed under every stage they list. Culling
/// is a per-item frustum test against [`RenderItem::bounds`]; items without
/// bounds always pass.
#[derive(Default)]
pub struct FlatListVisibilityManager {
    items: Vec<Arc<dyn RenderItem>>,
    distinct: AHashSet<usize>,
    by_stage: AHashMap<&'static str, Vec<Arc<dyn RenderItem>>>,
}

impl FlatListVisibilityManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `item` under each of its stages.
    ///
    /// Returns `false` (and changes nothing) if the same item is already registered.
    pub fn add_item(&mut self, item: Arc<dyn RenderItem>) -> bool {
        if !self.distinct.insert(item_key(&item)) {
            return false;
        }
        for &stage in item.stages() {
            self.by_stage
                .entry(stage)
                .or_default()
                .push(Arc::clone(&item));
        }
        self.items.push(item);
        true
    }

    /// Unregisters `item` from every stage. Returns `false` if it was not registered.
    pub fn remove_item(&mut self, item: &Arc<dyn RenderItem>) -> bool {
        let key = item_key(item);
        if !self.distinct.remove(&key) {
            return false;
        }
        self.items.retain(|other| item_key(other) != key);
        for list in self.by_stage.values_mut() {
            list.retain(|other| item_key(other) != key);
        }
        true
    }

    /// Every registered item, in registration order.
    pub fn items(&self) -> &[Arc<dyn RenderItem>] {
        &self.items
    }

    /// The items registered under `stage`, in registration order.
    pub fn items_for_stage(&self, stage: &str) -> &[Arc<dyn RenderItem>] {
        self.by_stage
            .get(stage)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unregisters everything.
    pub fn clear(&mut self) {
        self.items.clear();
        self.distinct.clear();
        self.by_stage.clear();
    }
}

impl VisibilityManager for FlatListVisibilityManager {
    fn collect_visible_objects(
        &self,
        queue: &mut RenderQueue,
        stage: &str,
        frustum: Option<&Frustum>,
        view_position: Vec3,
    ) -> Result<(), RenderError> {
        let (mut kept, mut culled) = (0usize, 0usize);
        for item in self.items_for_stage(stage) {
            let visible = match (frustum, item.bounds()) {
                (Some(frustum), Some(bounds)) => frustum.intersects_aabb(&bounds),
                _ => true,
            };
            if visible {
                queue.add_item(Arc::clone(item), view_position)?;
                kept += 1;
            } else {
                culled += 1;
            }
        }
        log::trace!(
            "FlatListVisibilityManager: '{stage}' kept {kept} item(s), culled {culled}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vireo_core::math::{Aabb, Mat4, FRAC_PI_2};
    use vireo_core::renderer::RenderContext;

    struct Prop {
        stages: &'static [&'static str],
        bounds: Option<Aabb>,
    }

    impl RenderItem for Prop {
        fn render(&self, _: &mut dyn RenderContext, _: &str) -> Result<(), RenderError> {
            Ok(())
        }

        fn stages(&self) -> &[&'static str] {
            self.stages
        }

        fn bounds(&self) -> Option<Aabb> {
            self.bounds
        }
    }

    fn prop(stages: &'static [&'static str], center: Option<Vec3>) -> Arc<dyn RenderItem> {
        Arc::new(Prop {
            stages,
            bounds: center.map(|c| Aabb::from_center_half_extents(c, Vec3::ONE)),
        })
    }

    fn forward_frustum() -> Frustum {
        let view = Mat4::look_at_rh(Vec3::ZERO, -Vec3::Z, Vec3::Y).unwrap();
        let proj = Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 0.1, 100.0);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn items_are_filed_per_stage() {
        let mut manager = FlatListVisibilityManager::new();
        let both = prop(&["Standard", "ShadowMap"], None);
        let main_only = prop(&["Standard"], None);
        assert!(manager.add_item(Arc::clone(&both)));
        assert!(manager.add_item(Arc::clone(&main_only)));
        assert!(!manager.add_item(Arc::clone(&both)));

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.items_for_stage("Standard").len(), 2);
        assert_eq!(manager.items_for_stage("ShadowMap").len(), 1);
        assert!(manager.items_for_stage("Overlay").is_empty());
    }

    #[test]
    fn removal_clears_every_stage() {
        let mut manager = FlatListVisibilityManager::new();
        let item = prop(&["Standard", "ShadowMap"], None);
        manager.add_item(Arc::clone(&item));
        assert!(manager.remove_item(&item));
        assert!(!manager.remove_item(&item));
        assert!(manager.is_empty());
        assert!(manager.items_for_stage("ShadowMap").is_empty());
    }

    #[test]
    fn frustum_culls_bounded_items_only() {
        let mut manager = FlatListVisibilityManager::new();
        manager.add_item(prop(&["Standard"], Some(Vec3::new(0.0, 0.0, -10.0))));
        manager.add_item(prop(&["Standard"], Some(Vec3::new(0.0, 0.0, 10.0))));
        manager.add_item(prop(&["Standard"], None));

        let mut queue = RenderQueue::new();
        let frustum = forward_frustum();
        manager
            .collect_visible_objects(&mut queue, "Standard", Some(&frustum), Vec3::ZERO)
            .unwrap();
        assert_eq!(queue.len(), 2);

        queue.clear();
        manager
            .collect_visible_objects(&mut queue, "Standard", None, Vec3::ZERO)
            .unwrap();
        assert_eq!(queue.len(), 3);
    }
}
