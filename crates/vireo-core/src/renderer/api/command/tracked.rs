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

//! A memoization cell for bound state.

/// Remembers the last value submitted for a binding slot so redundant
/// state changes can be skipped.
///
/// Equality is value equality on `T`, which for the recorder's slots is the
/// resource handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracked<T> {
    last_submitted: Option<T>,
}

impl<T> Tracked<T> {
    /// A tracker with nothing submitted yet.
    pub const fn new() -> Self {
        Self {
            last_submitted: None,
        }
    }

    /// The value last recorded by [`Tracked::update`], if any.
    pub fn get(&self) -> Option<&T> {
        self.last_submitted.as_ref()
    }

    /// Forgets the submitted value so the next `update` reports a change.
    pub fn invalidate(&mut self) {
        self.last_submitted = None;
    }
}

impl<T: PartialEq> Tracked<T> {
    /// Records `new` and returns `true` if it differs from the last submitted value.
    ///
    /// Always `true` right after construction or [`Tracked::invalidate`].
    #[must_use]
    pub fn update(&mut self, new: T) -> bool {
        if self.last_submitted.as_ref() == Some(&new) {
            return false;
        }
        self.last_submitted = Some(new);
        true
    }
}

impl<T> Default for Tracked<T> {
    fn default() -> Self {
        Self::new()
    }
}
