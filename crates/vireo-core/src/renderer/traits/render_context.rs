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

use crate::renderer::api::command::CommandRecorder;
use crate::renderer::api::resource::Framebuffer;
use crate::renderer::error::RenderError;
use std::sync::{Arc, Mutex, Weak};

/// The frame currently being recorded, as seen by stages and render items.
pub trait RenderContext {
    /// Binds the device's default framebuffer (usually the swapchain image).
    fn set_default_framebuffer(&mut self) -> Result<(), RenderError>;

    /// Binds `framebuffer`.
    fn set_framebuffer(&mut self, framebuffer: &Framebuffer) -> Result<(), RenderError>;

    /// Sets viewport slot 0.
    fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32)
        -> Result<(), RenderError>;

    /// The framebuffer currently bound, if any.
    fn current_framebuffer(&self) -> Option<Framebuffer>;

    /// The recorder commands go into.
    fn recorder(&mut self) -> &mut CommandRecorder;
}

/// A rendering context shared by every stage of a renderer.
pub type SharedRenderContext = Arc<Mutex<dyn RenderContext + Send>>;

/// The non-owning handle stages keep to the shared context.
pub type WeakRenderContext = Weak<Mutex<dyn RenderContext + Send>>;

/// Locks the context behind `weak` and runs `f` on it.
///
/// Fails with [`RenderError::InvalidState`] if the context has been dropped or
/// a previous user panicked while holding it.
pub fn with_context<R>(
    weak: &WeakRenderContext,
    f: impl FnOnce(&mut dyn RenderContext) -> Result<R, RenderError>,
) -> Result<R, RenderError> {
    let context = weak
        .upgrade()
        .ok_or_else(|| RenderError::invalid_state("the render context has been dropped"))?;
    let mut guard = context
        .lock()
        .map_err(|_| RenderError::invalid_state("the render context lock is poisoned"))?;
    f(&mut *guard)
}
