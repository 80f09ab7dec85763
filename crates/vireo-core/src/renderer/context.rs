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

//! The [`RenderContext`] that records into a [`CommandRecorder`].

use crate::renderer::api::command::{CommandLog, CommandRecorder, LogTicket};
use crate::renderer::api::resource::{Framebuffer, Viewport};
use crate::renderer::api::settings::RenderSettings;
use crate::renderer::error::RenderError;
use crate::renderer::traits::{RenderContext, SharedRenderContext};
use std::sync::{Arc, Mutex};

/// A rendering context that records everything into its own command log.
///
/// A frame is bracketed by [`RecordingContext::begin_frame`] and
/// [`RecordingContext::end_frame`]; the ticket returned by the latter replays
/// the frame into a backend.
#[derive(Debug)]
pub struct RecordingContext {
    recorder: CommandRecorder,
    default_framebuffer: Framebuffer,
}

impl RecordingContext {
    /// Creates a context whose default framebuffer is `default_framebuffer`.
    pub fn new(default_framebuffer: Framebuffer, settings: &RenderSettings) -> Self {
        Self {
            recorder: CommandRecorder::new(settings),
            default_framebuffer,
        }
    }

    /// Wraps the context for sharing, returning both the concrete handle and
    /// the type-erased one stages take.
    pub fn into_shared(self) -> (Arc<Mutex<RecordingContext>>, SharedRenderContext) {
        let concrete = Arc::new(Mutex::new(self));
        let shared: SharedRenderContext = concrete.clone();
        (concrete, shared)
    }

    /// The framebuffer bound by [`RenderContext::set_default_framebuffer`].
    pub fn default_framebuffer(&self) -> &Framebuffer {
        &self.default_framebuffer
    }

    /// Updates the default framebuffer size, e.g. after a window resize.
    pub fn resize_default_framebuffer(&mut self, width: u32, height: u32) {
        log::info!(
            "RecordingContext: default framebuffer resized to {width}x{height}"
        );
        self.default_framebuffer.width = width;
        self.default_framebuffer.height = height;
    }

    /// Starts a new frame, discarding the previous recording.
    pub fn begin_frame(&mut self) {
        self.recorder.reset();
    }

    /// Finishes the frame and seals its command log.
    pub fn end_frame(&mut self) -> Result<LogTicket, RenderError> {
        self.recorder.finish()
    }

    /// The log recorded so far.
    pub fn log(&self) -> &CommandLog {
        self.recorder.log()
    }
}

impl RenderContext for RecordingContext {
    fn set_default_framebuffer(&mut self) -> Result<(), RenderError> {
        let framebuffer = self.default_framebuffer;
        self.recorder.set_framebuffer(&framebuffer)
    }

    fn set_framebuffer(&mut self, framebuffer: &Framebuffer) -> Result<(), RenderError> {
        self.recorder.set_framebuffer(framebuffer)
    }

    fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), RenderError> {
        self.recorder
            .set_viewport(0, Viewport::new(x, y, width, height))
    }

    fn current_framebuffer(&self) -> Option<Framebuffer> {
        self.recorder.bound_framebuffer().copied()
    }

    fn recorder(&mut self) -> &mut CommandRecorder {
        &mut self.recorder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::command::CommandKind;
    use crate::renderer::api::resource::FramebufferId;
    use crate::renderer::traits::with_context;

    fn swapchain() -> Framebuffer {
        Framebuffer::color(FramebufferId(0), 1280, 720, 1).with_depth(true)
    }

    #[test]
    fn default_framebuffer_becomes_current() {
        let mut ctx = RecordingContext::new(swapchain(), &RenderSettings::default());
        assert!(ctx.current_framebuffer().is_none());
        ctx.set_default_framebuffer().unwrap();
        let current = ctx.current_framebuffer().unwrap();
        assert_eq!((current.width, current.height), (1280, 720));
    }

    #[test]
    fn frame_lifecycle_seals_and_resets() {
        let mut ctx = RecordingContext::new(swapchain(), &RenderSettings::default());
        ctx.begin_frame();
        ctx.set_default_framebuffer().unwrap();
        ctx.set_viewport(0.0, 0.0, 1280.0, 720.0).unwrap();
        let ticket = ctx.end_frame().unwrap();
        assert_eq!(ticket.len(), 2);
        assert!(ctx.log().is_sealed());

        ctx.begin_frame();
        assert!(ctx.log().is_empty());
        assert!(ctx.current_framebuffer().is_none());
    }

    #[test]
    fn shared_handle_reaches_the_same_context() {
        let (concrete, shared) =
            RecordingContext::new(swapchain(), &RenderSettings::default()).into_shared();
        let weak = Arc::downgrade(&shared);
        with_context(&weak, |ctx| ctx.set_default_framebuffer()).unwrap();
        let kinds: Vec<_> = concrete
            .lock()
            .unwrap()
            .log()
            .entries()
            .iter()
            .map(|e| e.kind())
            .collect();
        assert_eq!(kinds, [CommandKind::SetFramebuffer]);

        drop(shared);
        drop(concrete);
        assert!(matches!(
            with_context(&weak, |_| Ok(())),
            Err(RenderError::InvalidState(_))
        ));
    }
}
