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

//! The public recording surface.

use super::entry::{CommandEntry, DrawArgs, RenderPassBegin, TextureBarrier};
use super::log::{CommandLog, LogTicket};
use super::tracked::Tracked;
use crate::math::LinearRgba;
use crate::renderer::api::resource::{
    Framebuffer, FramebufferId, LoadOp, Pipeline, PipelineId, PipelineKind, PipelineStageFlags,
    StoreOp, TextureId, Viewport,
};
use crate::renderer::api::settings::RenderSettings;
use crate::renderer::error::RenderError;

/// Records commands into a [`CommandLog`], skipping state changes that would
/// rebind what is already bound.
///
/// Only `set_pipeline`, `set_framebuffer` and `set_viewport` are ever elided.
/// Everything else is appended as requested. With
/// [`RenderSettings::validate_usage`] enabled the recorder also rejects
/// commands that could not execute in the current state.
///
/// Recording never touches a graphics context; the log is handed to a
/// [`CommandExecutor`](crate::renderer::traits::CommandExecutor) afterwards.
#[derive(Debug)]
pub struct CommandRecorder {
    log: CommandLog,
    graphics_pipeline: Tracked<PipelineId>,
    compute_pipeline: Tracked<PipelineId>,
    framebuffer: Tracked<FramebufferId>,
    viewports: Vec<Tracked<Viewport>>,
    // Descriptor of the bound framebuffer, kept for validation and full viewports.
    bound_framebuffer: Option<Framebuffer>,
    debug_depth: u32,
    validate_usage: bool,
}

impl CommandRecorder {
    /// Creates a recorder sized and configured from `settings`.
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            log: CommandLog::from_settings(settings),
            graphics_pipeline: Tracked::new(),
            compute_pipeline: Tracked::new(),
            framebuffer: Tracked::new(),
            viewports: (0..settings.max_viewports.max(1))
                .map(|_| Tracked::new())
                .collect(),
            bound_framebuffer: None,
            debug_depth: 0,
            validate_usage: settings.validate_usage,
        }
    }

    /// The log being recorded into.
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// The framebuffer most recently bound, if any.
    pub fn bound_framebuffer(&self) -> Option<&Framebuffer> {
        self.bound_framebuffer.as_ref()
    }

    /// Whether usage validation is enabled.
    pub fn validates_usage(&self) -> bool {
        self.validate_usage
    }

    /// Number of viewport slots tracked.
    pub fn max_viewports(&self) -> usize {
        self.viewports.len()
    }

    /// Starts a new recording: clears the log and forgets all bound state.
    pub fn reset(&mut self) {
        self.log.reset();
        self.graphics_pipeline.invalidate();
        self.compute_pipeline.invalidate();
        self.framebuffer.invalidate();
        self.invalidate_viewports();
        self.bound_framebuffer = None;
        self.debug_depth = 0;
    }

    /// Finishes the recording and seals the log.
    pub fn finish(&mut self) -> Result<LogTicket, RenderError> {
        if self.validate_usage && self.debug_depth != 0 {
            return Err(RenderError::invalid_state(format!(
                "{} debug group(s) still open when finishing the recording",
                self.debug_depth
            )));
        }
        Ok(self.log.seal())
    }

    /// Starts a render pass on `framebuffer`. Always recorded.
    ///
    /// The framebuffer becomes the bound one, so a following `set_framebuffer`
    /// with the same handle is skipped.
    pub fn begin_render_pass(
        &mut self,
        framebuffer: &Framebuffer,
        load: LoadOp,
        store: StoreOp,
        clear_color: LinearRgba,
        clear_depth: f32,
    ) -> Result<(), RenderError> {
        self.log.append(CommandEntry::BeginRenderPass(RenderPassBegin {
            framebuffer: framebuffer.id,
            load,
            store,
            clear_color,
            clear_depth,
        }))?;
        let _ = self.framebuffer.update(framebuffer.id);
        self.bind_framebuffer(framebuffer);
        Ok(())
    }

    /// Binds a pipeline, skipping the command if it is already bound.
    ///
    /// Graphics and compute pipelines are tracked in separate slots.
    pub fn set_pipeline(&mut self, pipeline: Pipeline) -> Result<(), RenderError> {
        let slot = match pipeline.kind {
            PipelineKind::Graphics => &mut self.graphics_pipeline,
            PipelineKind::Compute => &mut self.compute_pipeline,
        };
        if slot.update(pipeline.id) {
            if let Err(err) = self.log.append(CommandEntry::SetPipeline(pipeline)) {
                slot.invalidate();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Binds a framebuffer, skipping the command if it is already bound.
    ///
    /// When the framebuffer changes every viewport slot is forgotten, so the
    /// next `set_viewport` is always recorded.
    pub fn set_framebuffer(&mut self, framebuffer: &Framebuffer) -> Result<(), RenderError> {
        if self.framebuffer.update(framebuffer.id) {
            if let Err(err) = self.log.append(CommandEntry::SetFramebuffer(framebuffer.id)) {
                self.framebuffer.invalidate();
                return Err(err);
            }
            self.invalidate_viewports();
        }
        self.bound_framebuffer = Some(*framebuffer);
        Ok(())
    }

    /// Sets a viewport slot, skipping the command if that slot already holds `viewport`.
    pub fn set_viewport(&mut self, index: u32, viewport: Viewport) -> Result<(), RenderError> {
        let max = self.viewports.len();
        let slot = self.viewports.get_mut(index as usize).ok_or_else(|| {
            RenderError::resource_mismatch(format!(
                "viewport index {index} is out of range (max {max})"
            ))
        })?;
        if slot.update(viewport) {
            if let Err(err) = self.log.append(CommandEntry::SetViewport { index, viewport }) {
                slot.invalidate();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Sets a full-size viewport for every color target of the bound framebuffer
    /// (at least slot 0, so depth-only framebuffers get one too).
    pub fn set_full_viewports(&mut self) -> Result<(), RenderError> {
        let framebuffer = self
            .bound_framebuffer
            .ok_or_else(|| RenderError::invalid_state("no framebuffer bound"))?;
        let full = framebuffer.full_viewport();
        let count = framebuffer.color_target_count.max(1);
        for index in 0..count {
            self.set_viewport(index, full)?;
        }
        Ok(())
    }

    /// Clears one color target of the bound framebuffer.
    pub fn clear_color_target(&mut self, index: u32, color: LinearRgba) -> Result<(), RenderError> {
        if self.validate_usage {
            let framebuffer = self.require_framebuffer("clear a color target")?;
            if index >= framebuffer.color_target_count {
                return Err(RenderError::resource_mismatch(format!(
                    "color target index {index} is out of range: framebuffer {:?} has {} color target(s)",
                    framebuffer.id, framebuffer.color_target_count
                )));
            }
        }
        self.log
            .append(CommandEntry::ClearColorTarget { index, color })
    }

    /// Clears the depth/stencil target of the bound framebuffer.
    pub fn clear_depth_stencil(&mut self, depth: f32, stencil: u8) -> Result<(), RenderError> {
        if self.validate_usage {
            let framebuffer = self.require_framebuffer("clear the depth target")?;
            if !framebuffer.has_depth {
                return Err(RenderError::resource_mismatch(format!(
                    "framebuffer {:?} has no depth target",
                    framebuffer.id
                )));
            }
        }
        self.log
            .append(CommandEntry::ClearDepthStencil { depth, stencil })
    }

    /// Records a non-indexed draw. Always recorded.
    pub fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        vertex_start: u32,
        instance_start: u32,
    ) -> Result<(), RenderError> {
        if self.validate_usage {
            if self.graphics_pipeline.get().is_none() {
                return Err(RenderError::invalid_state(
                    "a graphics pipeline must be set before drawing",
                ));
            }
            self.require_framebuffer("draw")?;
        }
        self.log.append(CommandEntry::Draw(DrawArgs {
            vertex_count,
            instance_count,
            vertex_start,
            instance_start,
        }))
    }

    /// Records a compute dispatch. Always recorded.
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Result<(), RenderError> {
        if self.validate_usage && self.compute_pipeline.get().is_none() {
            return Err(RenderError::invalid_state(
                "a compute pipeline must be set before dispatching",
            ));
        }
        self.log.append(CommandEntry::Dispatch { x, y, z })
    }

    /// Records a texture memory barrier. Always recorded.
    pub fn memory_barrier(&mut self, barrier: TextureBarrier) -> Result<(), RenderError> {
        self.log.append(CommandEntry::MemoryBarrier(barrier))
    }

    /// Records a mip chain regeneration for `texture`.
    ///
    /// A full-range barrier into the transfer stage is recorded first, unless
    /// the previous entry already is such a barrier on the same texture.
    pub fn generate_mipmaps(&mut self, texture: TextureId) -> Result<(), RenderError> {
        let covered = matches!(
            self.log.last(),
            Some(CommandEntry::MemoryBarrier(b))
                if b.texture == texture && b.dst_stages.contains(PipelineStageFlags::TRANSFER)
        );
        if !covered {
            self.memory_barrier(TextureBarrier::full(
                texture,
                PipelineStageFlags::ALL,
                PipelineStageFlags::TRANSFER,
            ))?;
        }
        self.log.append(CommandEntry::GenerateMipmaps(texture))
    }

    /// Opens a named debug scope.
    pub fn push_debug_group(&mut self, label: &str) -> Result<(), RenderError> {
        let span = self.log.intern_label(label)?;
        self.log.append(CommandEntry::PushDebugGroup(span))?;
        self.debug_depth += 1;
        Ok(())
    }

    /// Closes the innermost debug scope.
    pub fn pop_debug_group(&mut self) -> Result<(), RenderError> {
        if self.validate_usage && self.debug_depth == 0 {
            return Err(RenderError::invalid_state(
                "pop_debug_group without a matching push_debug_group",
            ));
        }
        self.log.append(CommandEntry::PopDebugGroup)?;
        self.debug_depth = self.debug_depth.saturating_sub(1);
        Ok(())
    }

    /// Inserts a single named debug marker.
    pub fn insert_debug_marker(&mut self, label: &str) -> Result<(), RenderError> {
        let span = self.log.intern_label(label)?;
        self.log.append(CommandEntry::InsertDebugMarker(span))
    }

    fn bind_framebuffer(&mut self, framebuffer: &Framebuffer) {
        self.bound_framebuffer = Some(*framebuffer);
        self.invalidate_viewports();
    }

    fn invalidate_viewports(&mut self) {
        for slot in &mut self.viewports {
            slot.invalidate();
        }
    }

    fn require_framebuffer(&self, action: &str) -> Result<&Framebuffer, RenderError> {
        self.bound_framebuffer
            .as_ref()
            .ok_or_else(|| RenderError::invalid_state(format!("a framebuffer must be set to {action}")))
    }
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::command::CommandKind;

    const MAIN: Framebuffer = Framebuffer::color(FramebufferId(1), 800, 600, 1);
    const GBUFFER: Framebuffer = Framebuffer::color(FramebufferId(2), 800, 600, 3);
    const MESH: Pipeline = Pipeline::graphics(PipelineId(10));
    const SKY: Pipeline = Pipeline::graphics(PipelineId(11));

    fn kinds(recorder: &CommandRecorder) -> Vec<CommandKind> {
        recorder.log().entries().iter().map(CommandEntry::kind).collect()
    }

    #[test]
    fn repeated_pipeline_is_recorded_once() {
        let mut rec = CommandRecorder::default();
        rec.set_pipeline(MESH).unwrap();
        rec.set_pipeline(MESH).unwrap();
        assert_eq!(rec.log().len(), 1);
        rec.set_pipeline(SKY).unwrap();
        rec.set_pipeline(MESH).unwrap();
        assert_eq!(rec.log().len(), 3);
    }

    #[test]
    fn compute_and_graphics_slots_are_independent() {
        let mut rec = CommandRecorder::default();
        let cull = Pipeline::compute(PipelineId(10));
        rec.set_pipeline(MESH).unwrap();
        rec.set_pipeline(cull).unwrap();
        rec.set_pipeline(MESH).unwrap();
        rec.set_pipeline(cull).unwrap();
        assert_eq!(rec.log().len(), 2);
    }

    #[test]
    fn framebuffer_change_forces_viewport() {
        let mut rec = CommandRecorder::default();
        let full = MAIN.full_viewport();
        rec.set_framebuffer(&MAIN).unwrap();
        rec.set_viewport(0, full).unwrap();
        rec.set_viewport(0, full).unwrap();
        assert_eq!(kinds(&rec), [CommandKind::SetFramebuffer, CommandKind::SetViewport]);

        // Same framebuffer: still deduplicated.
        rec.set_framebuffer(&MAIN).unwrap();
        rec.set_viewport(0, full).unwrap();
        assert_eq!(rec.log().len(), 2);

        // Different framebuffer: the identical viewport is emitted again.
        rec.set_framebuffer(&GBUFFER).unwrap();
        rec.set_viewport(0, full).unwrap();
        assert_eq!(
            kinds(&rec)[2..],
            [CommandKind::SetFramebuffer, CommandKind::SetViewport]
        );
    }

    #[test]
    fn draws_are_never_deduplicated() {
        let mut rec = CommandRecorder::default();
        rec.set_framebuffer(&MAIN).unwrap();
        rec.set_pipeline(MESH).unwrap();
        rec.draw(3, 1, 0, 0).unwrap();
        rec.draw(3, 1, 0, 0).unwrap();
        assert_eq!(rec.log().len(), 4);
    }

    #[test]
    fn clear_validation() {
        let mut rec = CommandRecorder::default();
        assert!(matches!(
            rec.clear_color_target(0, LinearRgba::BLACK),
            Err(RenderError::InvalidState(_))
        ));
        rec.set_framebuffer(&MAIN).unwrap();
        rec.clear_color_target(0, LinearRgba::BLACK).unwrap();
        assert!(matches!(
            rec.clear_color_target(1, LinearRgba::BLACK),
            Err(RenderError::ResourceMismatch(_))
        ));
        assert!(matches!(
            rec.clear_depth_stencil(1.0, 0),
            Err(RenderError::ResourceMismatch(_))
        ));
        rec.set_framebuffer(&MAIN.with_depth(true)).unwrap();
        rec.clear_depth_stencil(1.0, 0).unwrap();
    }

    #[test]
    fn validation_can_be_disabled() {
        let settings = RenderSettings {
            validate_usage: false,
            ..Default::default()
        };
        let mut rec = CommandRecorder::new(&settings);
        rec.draw(3, 1, 0, 0).unwrap();
        rec.dispatch(1, 1, 1).unwrap();
        rec.clear_color_target(4, LinearRgba::BLACK).unwrap();
        assert_eq!(rec.log().len(), 3);
    }

    #[test]
    fn draw_and_dispatch_need_pipelines() {
        let mut rec = CommandRecorder::default();
        rec.set_framebuffer(&MAIN).unwrap();
        assert!(matches!(rec.draw(3, 1, 0, 0), Err(RenderError::InvalidState(_))));
        rec.set_pipeline(Pipeline::compute(PipelineId(5))).unwrap();
        assert!(matches!(rec.draw(3, 1, 0, 0), Err(RenderError::InvalidState(_))));
        rec.dispatch(8, 8, 1).unwrap();
    }

    #[test]
    fn viewport_index_is_bounded() {
        let mut rec = CommandRecorder::default();
        let max = rec.max_viewports() as u32;
        assert!(matches!(
            rec.set_viewport(max, MAIN.full_viewport()),
            Err(RenderError::ResourceMismatch(_))
        ));
    }

    #[test]
    fn full_viewports_cover_every_color_target() {
        let mut rec = CommandRecorder::default();
        assert!(rec.set_full_viewports().is_err());
        rec.set_framebuffer(&GBUFFER).unwrap();
        rec.set_full_viewports().unwrap();
        let viewports = kinds(&rec)
            .into_iter()
            .filter(|k| *k == CommandKind::SetViewport)
            .count();
        assert_eq!(viewports, 3);
    }

    #[test]
    fn mipmaps_get_a_barrier_unless_one_precedes() {
        let texture = TextureId(9);
        let mut rec = CommandRecorder::default();
        rec.generate_mipmaps(texture).unwrap();
        assert_eq!(kinds(&rec), [CommandKind::MemoryBarrier, CommandKind::GenerateMipmaps]);

        rec.memory_barrier(TextureBarrier::full(
            texture,
            PipelineStageFlags::FRAGMENT,
            PipelineStageFlags::TRANSFER | PipelineStageFlags::FRAGMENT,
        ))
        .unwrap();
        rec.generate_mipmaps(texture).unwrap();
        assert_eq!(rec.log().len(), 4);

        // A barrier on another texture does not count.
        rec.memory_barrier(TextureBarrier::full(
            TextureId(1),
            PipelineStageFlags::ALL,
            PipelineStageFlags::TRANSFER,
        ))
        .unwrap();
        rec.generate_mipmaps(texture).unwrap();
        assert_eq!(rec.log().len(), 7);
    }

    #[test]
    fn debug_groups_must_balance() {
        let mut rec = CommandRecorder::default();
        assert!(matches!(rec.pop_debug_group(), Err(RenderError::InvalidState(_))));
        rec.push_debug_group("frame").unwrap();
        rec.insert_debug_marker("here").unwrap();
        assert!(matches!(rec.finish(), Err(RenderError::InvalidState(_))));
        rec.pop_debug_group().unwrap();
        let ticket = rec.finish().unwrap();
        assert_eq!(ticket.len(), 3);
    }

    #[test]
    fn reset_forgets_bound_state() {
        let mut rec = CommandRecorder::default();
        rec.set_framebuffer(&MAIN).unwrap();
        rec.set_pipeline(MESH).unwrap();
        rec.finish().unwrap();
        rec.reset();
        assert!(rec.bound_framebuffer().is_none());
        rec.set_framebuffer(&MAIN).unwrap();
        rec.set_pipeline(MESH).unwrap();
        assert_eq!(rec.log().len(), 2);
    }

    #[test]
    fn begin_render_pass_binds_framebuffer() {
        let mut rec = CommandRecorder::default();
        rec.begin_render_pass(&MAIN, LoadOp::Clear, StoreOp::Store, LinearRgba::BLACK, 1.0)
            .unwrap();
        rec.set_framebuffer(&MAIN).unwrap();
        assert_eq!(kinds(&rec), [CommandKind::BeginRenderPass]);
        assert_eq!(rec.bound_framebuffer(), Some(&MAIN));
    }

    #[test]
    fn recording_after_finish_fails() {
        let mut rec = CommandRecorder::default();
        rec.finish().unwrap();
        assert!(matches!(rec.set_pipeline(MESH), Err(RenderError::InvalidState(_))));
        // The failed bind is not remembered.
        rec.reset();
        rec.set_pipeline(MESH).unwrap();
        assert_eq!(rec.log().len(), 1);
    }
}
