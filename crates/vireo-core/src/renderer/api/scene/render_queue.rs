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

//! The per-stage list of items to draw and the orderings applied to it.

use super::order::RenderOrderKey;
use crate::math::Vec3;
use crate::renderer::api::settings::RenderSettings;
use crate::renderer::error::RenderError;
use crate::renderer::traits::RenderItem;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A function ordering two render order keys.
///
/// The queue sort is stable, so keys comparing equal keep their insertion
/// order. A comparer that is not a total order yields an unspecified
/// permutation of the items, never a panic.
pub type RenderComparer = fn(&RenderOrderKey, &RenderOrderKey) -> Ordering;

/// Opaque items first, nearest to farthest, then translucent items farthest to nearest.
pub fn default_comparer(a: &RenderOrderKey, b: &RenderOrderKey) -> Ordering {
    match (a.translucent, b.translucent) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.distance_sq.total_cmp(&b.distance_sq),
        (true, true) => b.distance_sq.total_cmp(&a.distance_sq),
    }
}

/// Like [`default_comparer`], but opaque items are grouped by material
/// before distance to cut down on pipeline switches. Translucent items still
/// go strictly back to front.
pub fn material_then_distance(a: &RenderOrderKey, b: &RenderOrderKey) -> Ordering {
    match (a.translucent, b.translucent) {
        (false, false) => a
            .material
            .cmp(&b.material)
            .then_with(|| a.distance_sq.total_cmp(&b.distance_sq)),
        _ => default_comparer(a, b),
    }
}

/// Cached comparer used when a stage has no custom one.
pub const DEFAULT_COMPARER: RenderComparer = default_comparer;

/// Cached material-grouping comparer.
pub const MATERIAL_COMPARER: RenderComparer = material_then_distance;

struct QueueEntry {
    item: Arc<dyn RenderItem>,
    key: RenderOrderKey,
}

/// A sortable list of render items with their order keys.
///
/// The queue is cleared and refilled on every stage execution. Clearing keeps
/// the allocation. Once sorted, it refuses new items until the next
/// [`RenderQueue::clear`].
pub struct RenderQueue {
    entries: Vec<QueueEntry>,
    // Sort permutation and merge buffer, kept to avoid per-frame allocation.
    order: Vec<usize>,
    scratch: Vec<usize>,
    sorted: bool,
}

impl RenderQueue {
    /// Initial capacity when none is configured.
    pub const DEFAULT_CAPACITY: usize = 250;

    /// Creates an empty queue with [`RenderQueue::DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty queue with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            scratch: Vec::with_capacity(capacity),
            sorted: false,
        }
    }

    /// Creates an empty queue sized from `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::with_capacity(settings.queue_capacity)
    }

    /// Removes every item, keeping the storage.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sorted = false;
    }

    /// Adds an item with a precomputed key.
    pub fn add(&mut self, item: Arc<dyn RenderItem>, key: RenderOrderKey) -> Result<(), RenderError> {
        if self.sorted {
            return Err(RenderError::invalid_state(
                "cannot add to a render queue after it was sorted; clear it first",
            ));
        }
        self.entries.push(QueueEntry { item, key });
        Ok(())
    }

    /// Adds an item keyed by its own [`RenderItem::render_order_key`].
    pub fn add_item(&mut self, item: Arc<dyn RenderItem>, view_position: Vec3) -> Result<(), RenderError> {
        let key = item.render_order_key(view_position);
        self.add(item, key)
    }

    /// Adds every item of `items`, each keyed from `view_position`.
    pub fn add_range<'a, I>(&mut self, items: I, view_position: Vec3) -> Result<(), RenderError>
    where
        I: IntoIterator<Item = &'a Arc<dyn RenderItem>>,
    {
        for item in items {
            self.add_item(Arc::clone(item), view_position)?;
        }
        Ok(())
    }

    /// Sorts the queue with `comparer`, or [`default_comparer`] when `None`.
    ///
    /// The sort is stable. Sorting an empty queue does nothing.
    pub fn sort(&mut self, comparer: Option<RenderComparer>) {
        if self.entries.is_empty() {
            return;
        }
        let comparer = comparer.unwrap_or(DEFAULT_COMPARER);
        self.merge_sort_order(comparer);
        apply_permutation(&mut self.entries, &mut self.order);
        self.sorted = true;
    }

    /// Fills `order` with the stable sorted permutation of `entries`.
    ///
    /// Bottom-up merge sort over indices. Each merge step only asks whether the
    /// right-hand key goes strictly before the left-hand one, so every index is
    /// emitted exactly once whatever the comparer answers.
    fn merge_sort_order(&mut self, comparer: RenderComparer) {
        let len = self.entries.len();
        self.order.clear();
        self.order.extend(0..len);
        self.scratch.clear();
        self.scratch.resize(len, 0);

        let mut width = 1;
        while width < len {
            let mut start = 0;
            while start < len {
                let mid = (start + width).min(len);
                let end = (start + 2 * width).min(len);
                let (mut left, mut right) = (start, mid);
                for slot in &mut self.scratch[start..end] {
                    let take_right = right < end
                        && (left >= mid
                            || comparer(
                                &self.entries[self.order[right]].key,
                                &self.entries[self.order[left]].key,
                            ) == Ordering::Less);
                    if take_right {
                        *slot = self.order[right];
                        right += 1;
                    } else {
                        *slot = self.order[left];
                        left += 1;
                    }
                }
                start = end;
            }
            std::mem::swap(&mut self.order, &mut self.scratch);
            width *= 2;
        }
    }

    /// Returns `true` once the queue has been sorted.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items the queue can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The items, in queue order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &Arc<dyn RenderItem>> + '_ {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// The keys, in queue order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &RenderOrderKey> + '_ {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Items paired with their keys, in queue order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Arc<dyn RenderItem>, &RenderOrderKey)> + '_ {
        self.entries.iter().map(|entry| (&entry.item, &entry.key))
    }
}

/// Reorders `entries` in place so that `entries[i]` becomes the old
/// `entries[order[i]]`. Leaves `order` as the identity.
fn apply_permutation(entries: &mut [QueueEntry], order: &mut [usize]) {
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != current {
            let next = order[current];
            order[current] = current;
            if next == start {
                break;
            }
            entries.swap(current, next);
            current = next;
        }
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderQueue")
            .field("len", &self.entries.len())
            .field("sorted", &self.sorted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::RenderContext;

    struct Dummy;

    impl RenderItem for Dummy {
        fn render(&self, _: &mut dyn RenderContext, _: &str) -> Result<(), RenderError> {
            Ok(())
        }

        fn stages(&self) -> &[&'static str] {
            &["Standard"]
        }
    }

    /// A queue plus the names of the items pushed into it.
    #[derive(Default)]
    struct Fixture {
        queue: RenderQueue,
        named: Vec<(&'static str, Arc<dyn RenderItem>)>,
    }

    impl Fixture {
        fn add(&mut self, name: &'static str, key: RenderOrderKey) {
            let item: Arc<dyn RenderItem> = Arc::new(Dummy);
            self.queue.add(Arc::clone(&item), key).unwrap();
            self.named.push((name, item));
        }

        fn order(&self) -> Vec<&'static str> {
            self.queue
                .items()
                .map(|queued| {
                    self.named
                        .iter()
                        .find(|(_, item)| Arc::ptr_eq(item, queued))
                        .map(|(name, _)| *name)
                        .unwrap()
                })
                .collect()
        }
    }

    fn key(translucent: bool, distance_sq: f32) -> RenderOrderKey {
        RenderOrderKey {
            translucent,
            distance_sq,
            material: 0,
        }
    }

    #[test]
    fn default_order_is_opaque_front_to_back_then_translucent_back_to_front() {
        let mut f = Fixture::default();
        f.add("A", key(false, 5.0));
        f.add("B", key(false, 2.0));
        f.add("C", key(true, 3.0));
        f.add("D", key(true, 8.0));
        f.queue.sort(None);
        assert_eq!(f.order(), ["B", "A", "D", "C"]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut f = Fixture::default();
        for name in ["first", "second", "third"] {
            f.add(name, key(false, 4.0));
        }
        f.add("glass", key(true, 4.0));
        f.add("water", key(true, 4.0));
        f.queue.sort(None);
        assert_eq!(f.order(), ["first", "second", "third", "glass", "water"]);
    }

    #[test]
    fn custom_comparer_replaces_default() {
        let mut f = Fixture::default();
        f.add("near", key(false, 1.0));
        f.add("far", key(false, 9.0));
        let farthest_first: RenderComparer = |a, b| b.distance_sq.total_cmp(&a.distance_sq);
        f.queue.sort(Some(farthest_first));
        assert_eq!(f.order(), ["far", "near"]);
    }

    #[test]
    fn material_comparer_groups_opaque_items() {
        let keyed = |material, distance_sq| RenderOrderKey {
            translucent: false,
            distance_sq,
            material,
        };
        let mut f = Fixture::default();
        f.add("m2-near", keyed(2, 1.0));
        f.add("m1-far", keyed(1, 9.0));
        f.add("m1-near", keyed(1, 2.0));
        f.add("glass", key(true, 1.0));
        f.queue.sort(Some(MATERIAL_COMPARER));
        assert_eq!(f.order(), ["m1-near", "m1-far", "m2-near", "glass"]);
    }

    #[test]
    fn add_after_sort_fails_until_cleared() {
        let mut queue = RenderQueue::with_capacity(4);
        queue.add(Arc::new(Dummy), key(false, 1.0)).unwrap();
        queue.sort(None);
        assert!(matches!(
            queue.add(Arc::new(Dummy), key(false, 1.0)),
            Err(RenderError::InvalidState(_))
        ));
        queue.clear();
        queue.add(Arc::new(Dummy), key(false, 1.0)).unwrap();
    }

    #[test]
    fn empty_sort_is_a_no_op() {
        let mut queue = RenderQueue::new();
        queue.sort(None);
        assert!(queue.is_empty());
        assert!(!queue.is_sorted());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut queue = RenderQueue::with_capacity(2);
        for _ in 0..10 {
            queue.add(Arc::new(Dummy), key(false, 1.0)).unwrap();
        }
        let capacity = queue.capacity();
        queue.clear();
        assert_eq!(queue.capacity(), capacity);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn add_range_keys_items_from_view_position() {
        let mut queue = RenderQueue::new();
        let item: Arc<dyn RenderItem> = Arc::new(Dummy);
        queue.add_range([&item], Vec3::new(3.0, 4.0, 0.0)).unwrap();
        let key = queue.keys().next().copied().unwrap();
        assert!(!key.translucent);
        assert_eq!(key.distance_sq, 25.0);
    }

    /// Xorshift state for a comparer that answers at random.
    static CHAOS: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0x9E37_79B9_7F4A_7C15);

    fn chaotic(_: &RenderOrderKey, _: &RenderOrderKey) -> Ordering {
        use std::sync::atomic::Ordering::Relaxed;
        let mut x = CHAOS.load(Relaxed);
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        CHAOS.store(x, Relaxed);
        match x % 3 {
            0 => Ordering::Less,
            1 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }

    #[test]
    fn inconsistent_comparer_still_yields_a_permutation() {
        for count in [2u32, 20, 257, 10_000] {
            let mut queue = RenderQueue::new();
            for id in 0..count {
                let tagged = RenderOrderKey {
                    material: id,
                    ..key(false, 1.0)
                };
                queue.add(Arc::new(Dummy), tagged).unwrap();
            }

            queue.sort(Some(chaotic));

            assert!(queue.is_sorted());
            let mut seen: Vec<u32> = queue.keys().map(|k| k.material).collect();
            seen.sort_unstable();
            assert!(seen.into_iter().eq(0..count));
        }
    }

    #[test]
    fn large_queue_sorts_like_a_stable_sort() {
        let mut queue = RenderQueue::new();
        let mut expected = Vec::new();
        for i in 0..600u32 {
            let k = key(i % 3 == 0, ((i * 7919) % 101) as f32);
            queue.add(Arc::new(Dummy), k).unwrap();
            expected.push(k);
        }
        expected.sort_by(default_comparer);

        queue.sort(None);

        assert!(queue.keys().copied().eq(expected));
    }
}
