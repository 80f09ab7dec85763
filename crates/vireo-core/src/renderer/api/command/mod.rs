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

//! Command recording and replay.
//!
//! A [`CommandRecorder`] turns draw requests into [`CommandEntry`] values
//! stored in a [`CommandLog`], using [`Tracked`] slots to drop state changes
//! that would rebind what is already bound. The log is later replayed, in
//! order, into a [`CommandExecutor`](crate::renderer::traits::CommandExecutor).

mod entry;
mod log;
mod recorder;
mod tracked;

pub use self::entry::{
    CommandEntry, CommandKind, DrawArgs, LabelSpan, RenderPassBegin, TextureBarrier,
};
pub use self::log::{CommandLog, LogTicket};
pub use self::recorder::CommandRecorder;
pub use self::tracked::Tracked;
