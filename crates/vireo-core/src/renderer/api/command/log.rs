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

//! The retained, reusable command buffer.

use super::entry::{CommandEntry, LabelSpan};
use crate::renderer::api::settings::RenderSettings;
use crate::renderer::error::RenderError;
use crate::renderer::traits::CommandExecutor;
use std::cell::Cell;

/// Proof that a log was sealed, used to replay it later.
///
/// A ticket goes stale as soon as the log is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogTicket {
    generation: u64,
    len: usize,
}

impl LogTicket {
    /// The log generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of entries the log held when sealed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sealed log held no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An ordered, append-only list of [`CommandEntry`] values.
///
/// The backing storage is reserved once and kept across [`CommandLog::reset`],
/// so steady-state recording does not allocate. Debug labels are copied into a
/// single string arena owned by the log instead of being allocated per entry.
#[derive(Debug)]
pub struct CommandLog {
    entries: Vec<CommandEntry>,
    labels: String,
    sealed: bool,
    generation: u64,
    // Index of the entry currently (or last) handed to an executor.
    cursor: Cell<usize>,
}

impl CommandLog {
    /// Creates an empty log with room for `entries` commands and `label_bytes` of labels.
    pub fn with_capacity(entries: usize, label_bytes: usize) -> Self {
        Self {
            entries: Vec::with_capacity(entries),
            labels: String::with_capacity(label_bytes),
            sealed: false,
            generation: 0,
            cursor: Cell::new(0),
        }
    }

    /// Creates an empty log sized from `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::with_capacity(settings.command_capacity, settings.label_capacity)
    }

    /// Appends an entry. Fails with [`RenderError::InvalidState`] once the log is sealed.
    pub fn append(&mut self, entry: CommandEntry) -> Result<(), RenderError> {
        if self.sealed {
            return Err(RenderError::invalid_state(format!(
                "cannot append {} to a sealed command log",
                entry.kind()
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Copies `label` into the label arena and returns a span referring to it.
    pub fn intern_label(&mut self, label: &str) -> Result<LabelSpan, RenderError> {
        if self.sealed {
            return Err(RenderError::invalid_state(
                "cannot record a debug label into a sealed command log",
            ));
        }
        let start = u32::try_from(self.labels.len())
            .map_err(|_| RenderError::resource_mismatch("debug label arena overflow"))?;
        let len = u32::try_from(label.len())
            .map_err(|_| RenderError::resource_mismatch("debug label too long"))?;
        self.labels.push_str(label);
        Ok(LabelSpan {
            start,
            len,
            generation: self.generation as u32,
        })
    }

    /// Resolves a label span recorded into this log.
    ///
    /// Returns an empty string for spans interned before the last
    /// [`CommandLog::reset`] or lying outside the arena.
    pub fn label(&self, span: LabelSpan) -> &str {
        if span.generation != self.generation as u32 {
            return "";
        }
        let start = span.start as usize;
        let end = start + span.len as usize;
        self.labels.get(start..end).unwrap_or("")
    }

    /// Clears the log for reuse, keeping its storage. Invalidates outstanding tickets.
    pub fn reset(&mut self) {
        if self.sealed && self.cursor.get() < self.entries.len() {
            log::warn!(
                "CommandLog: resetting a sealed log whose {} entries were never fully replayed",
                self.entries.len()
            );
        }
        self.entries.clear();
        self.labels.clear();
        self.sealed = false;
        self.generation = self.generation.wrapping_add(1);
        self.cursor.set(0);
    }

    /// Finishes recording. Further appends fail until the next [`CommandLog::reset`].
    ///
    /// Sealing an already sealed log returns the same ticket.
    pub fn seal(&mut self) -> LogTicket {
        self.sealed = true;
        LogTicket {
            generation: self.generation,
            len: self.entries.len(),
        }
    }

    /// Returns `true` once [`CommandLog::seal`] has been called.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries the log can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Incremented by every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The recorded entries, in execution order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// The most recently recorded entry.
    pub fn last(&self) -> Option<&CommandEntry> {
        self.entries.last()
    }

    /// Index of the entry last handed to an executor. After a complete
    /// replay this equals [`CommandLog::len`]; after a failed one it points
    /// at the failing entry.
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Feeds every entry to `executor` in insertion order, stopping at the first error.
    pub fn replay<E>(&self, executor: &mut E) -> Result<(), RenderError>
    where
        E: CommandExecutor + ?Sized,
    {
        for (index, entry) in self.entries.iter().enumerate() {
            self.cursor.set(index);
            if let Err(err) = self.execute(entry, executor) {
                log::debug!(
                    "CommandLog: replay stopped at entry {index} ({}): {err}",
                    entry.kind()
                );
                return Err(err);
            }
        }
        self.cursor.set(self.entries.len());
        Ok(())
    }

    /// Replays the log if `ticket` still refers to its current contents.
    pub fn replay_ticket<E>(&self, ticket: LogTicket, executor: &mut E) -> Result<(), RenderError>
    where
        E: CommandExecutor + ?Sized,
    {
        if ticket.generation != self.generation || !self.sealed {
            return Err(RenderError::invalid_state(format!(
                "stale command log ticket (ticket generation {}, log generation {})",
                ticket.generation, self.generation
            )));
        }
        debug_assert_eq!(ticket.len, self.entries.len());
        self.replay(executor)
    }

    fn execute<E>(&self, entry: &CommandEntry, executor: &mut E) -> Result<(), RenderError>
    where
        E: CommandExecutor + ?Sized,
    {
        match *entry {
            CommandEntry::BeginRenderPass(ref pass) => executor.begin_render_pass(pass),
            CommandEntry::SetViewport {
                index,
                ref viewport,
            } => executor.set_viewport(index, viewport),
            CommandEntry::ClearColorTarget { index, color } => {
                executor.clear_color_target(index, color)
            }
            CommandEntry::ClearDepthStencil { depth, stencil } => {
                executor.clear_depth_stencil(depth, stencil)
            }
            CommandEntry::SetPipeline(pipeline) => executor.set_pipeline(pipeline),
            CommandEntry::SetFramebuffer(framebuffer) => executor.set_framebuffer(framebuffer),
            CommandEntry::Draw(ref args) => executor.draw(args),
            CommandEntry::Dispatch { x, y, z } => executor.dispatch(x, y, z),
            CommandEntry::MemoryBarrier(ref barrier) => executor.memory_barrier(barrier),
            CommandEntry::GenerateMipmaps(texture) => executor.generate_mipmaps(texture),
            CommandEntry::PushDebugGroup(span) => executor.push_debug_group(self.label(span)),
            CommandEntry::PopDebugGroup => executor.pop_debug_group(),
            CommandEntry::InsertDebugMarker(span) => {
                executor.insert_debug_marker(self.label(span))
            }
        }
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::LinearRgba;
    use crate::renderer::api::command::{DrawArgs, RenderPassBegin, TextureBarrier};
    use crate::renderer::api::resource::{
        FramebufferId, Pipeline, PipelineId, TextureId, Viewport,
    };

    /// Collects a short description of every call it receives.
    #[derive(Default)]
    struct Collect {
        calls: Vec<String>,
        fail_on_draw: bool,
    }

    impl CommandExecutor for Collect {
        fn begin_render_pass(&mut self, pass: &RenderPassBegin) -> Result<(), RenderError> {
            self.calls.push(format!("begin {}", pass.framebuffer.0));
            Ok(())
        }
        fn set_viewport(&mut self, index: u32, _: &Viewport) -> Result<(), RenderError> {
            self.calls.push(format!("viewport {index}"));
            Ok(())
        }
        fn clear_color_target(&mut self, index: u32, _: LinearRgba) -> Result<(), RenderError> {
            self.calls.push(format!("clear {index}"));
            Ok(())
        }
        fn clear_depth_stencil(&mut self, _: f32, _: u8) -> Result<(), RenderError> {
            self.calls.push("clear depth".into());
            Ok(())
        }
        fn set_pipeline(&mut self, pipeline: Pipeline) -> Result<(), RenderError> {
            self.calls.push(format!("pipeline {}", pipeline.id.0));
            Ok(())
        }
        fn set_framebuffer(&mut self, framebuffer: FramebufferId) -> Result<(), RenderError> {
            self.calls.push(format!("framebuffer {}", framebuffer.0));
            Ok(())
        }
        fn draw(&mut self, args: &DrawArgs) -> Result<(), RenderError> {
            if self.fail_on_draw {
                return Err(RenderError::unsupported("draw"));
            }
            self.calls.push(format!("draw {}", args.vertex_count));
            Ok(())
        }
        fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Result<(), RenderError> {
            self.calls.push(format!("dispatch {x}x{y}x{z}"));
            Ok(())
        }
        fn memory_barrier(&mut self, barrier: &TextureBarrier) -> Result<(), RenderError> {
            self.calls.push(format!("barrier {}", barrier.texture.0));
            Ok(())
        }
        fn generate_mipmaps(&mut self, texture: TextureId) -> Result<(), RenderError> {
            self.calls.push(format!("mips {}", texture.0));
            Ok(())
        }
        fn push_debug_group(&mut self, label: &str) -> Result<(), RenderError> {
            self.calls.push(format!("push {label}"));
            Ok(())
        }
        fn pop_debug_group(&mut self) -> Result<(), RenderError> {
            self.calls.push("pop".into());
            Ok(())
        }
        fn insert_debug_marker(&mut self, label: &str) -> Result<(), RenderError> {
            self.calls.push(format!("marker {label}"));
            Ok(())
        }
    }

    fn draw(vertex_count: u32) -> CommandEntry {
        CommandEntry::Draw(DrawArgs {
            vertex_count,
            instance_count: 1,
            vertex_start: 0,
            instance_start: 0,
        })
    }

    #[test]
    fn replay_is_fifo() {
        let mut log = CommandLog::with_capacity(8, 64);
        log.append(CommandEntry::SetFramebuffer(FramebufferId(1))).unwrap();
        let span = log.intern_label("opaque").unwrap();
        log.append(CommandEntry::PushDebugGroup(span)).unwrap();
        log.append(CommandEntry::SetPipeline(Pipeline::graphics(PipelineId(4)))).unwrap();
        log.append(draw(3)).unwrap();
        log.append(CommandEntry::PopDebugGroup).unwrap();

        let mut exec = Collect::default();
        log.replay(&mut exec).unwrap();
        assert_eq!(
            exec.calls,
            ["framebuffer 1", "push opaque", "pipeline 4", "draw 3", "pop"]
        );
        assert_eq!(log.cursor(), log.len());
    }

    #[test]
    fn empty_log_replay_is_a_no_op() {
        let log = CommandLog::default();
        let mut exec = Collect::default();
        log.replay(&mut exec).unwrap();
        assert!(exec.calls.is_empty());
    }

    #[test]
    fn sealed_log_rejects_appends() {
        let mut log = CommandLog::default();
        log.append(draw(3)).unwrap();
        let ticket = log.seal();
        assert_eq!(ticket.len(), 1);
        assert!(matches!(log.append(draw(6)), Err(RenderError::InvalidState(_))));
        assert!(matches!(log.intern_label("x"), Err(RenderError::InvalidState(_))));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn reset_keeps_capacity_and_bumps_generation() {
        let mut log = CommandLog::with_capacity(4, 16);
        for _ in 0..4 {
            log.append(draw(3)).unwrap();
        }
        let capacity = log.capacity();
        let generation = log.generation();
        log.seal();
        log.reset();
        assert!(log.is_empty());
        assert!(!log.is_sealed());
        assert_eq!(log.capacity(), capacity);
        assert_eq!(log.generation(), generation + 1);
        log.append(draw(3)).unwrap();
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut log = CommandLog::default();
        log.append(draw(3)).unwrap();
        let ticket = log.seal();
        let mut exec = Collect::default();
        log.replay_ticket(ticket, &mut exec).unwrap();
        assert_eq!(exec.calls, ["draw 3"]);

        log.reset();
        log.append(draw(6)).unwrap();
        log.seal();
        assert!(matches!(
            log.replay_ticket(ticket, &mut exec),
            Err(RenderError::InvalidState(_))
        ));
    }

    #[test]
    fn replay_stops_at_first_error() {
        let mut log = CommandLog::default();
        log.append(CommandEntry::SetFramebuffer(FramebufferId(1))).unwrap();
        log.append(draw(3)).unwrap();
        log.append(CommandEntry::PopDebugGroup).unwrap();

        let mut exec = Collect {
            fail_on_draw: true,
            ..Default::default()
        };
        let err = log.replay(&mut exec).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedOperation(_)));
        assert_eq!(exec.calls, ["framebuffer 1"]);
        assert_eq!(log.cursor(), 1);
    }

    #[test]
    fn labels_share_one_arena() {
        let mut log = CommandLog::with_capacity(4, 32);
        let a = log.intern_label("shadow").unwrap();
        let b = log.intern_label("opaque").unwrap();
        assert_eq!(log.label(a), "shadow");
        assert_eq!(log.label(b), "opaque");
        log.reset();
        assert_eq!(log.label(a), "");
    }

    #[test]
    fn spans_from_before_reset_do_not_alias_new_labels() {
        let mut log = CommandLog::with_capacity(4, 32);
        let old = log.intern_label("shadow").unwrap();
        log.reset();
        let new = log.intern_label("bloom!").unwrap();
        assert_eq!(log.label(new), "bloom!");
        assert_eq!(log.label(old), "");
    }

    #[test]
    fn replay_after_reset_sees_only_new_entries() {
        let mut log = CommandLog::default();
        log.append(draw(1)).unwrap();
        log.append(draw(2)).unwrap();
        log.seal();
        log.reset();
        log.append(draw(3)).unwrap();

        let mut exec = Collect::default();
        log.replay(&mut exec).unwrap();
        assert_eq!(exec.calls, ["draw 3"]);
        assert_eq!(log.cursor(), 1);
    }
}
