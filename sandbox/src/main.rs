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

//! Records a few frames of a small scene and replays them into the trace executor.
//!
//! Usage: `sandbox [settings.json]`. Set `RUST_LOG=trace` to see every replayed command.

use anyhow::{anyhow, Context, Result};
use std::sync::{Arc, Mutex};
use vireo_core::math::{Aabb, Frustum, Mat4, Vec3, FRAC_PI_4};
use vireo_core::renderer::{
    CommandKind, Framebuffer, FramebufferId, Pipeline, PipelineId, RecordingContext,
    RenderContext, RenderError, RenderItem, RenderOrderKey, RenderSettings, TextureId,
};
use vireo_infra::{init_logging, TraceExecutor};
use vireo_lanes::render_lane::{DEFAULT_SHADOW_MAP_SIZE, SHADOW_MAP_STAGE, STANDARD_STAGE};
use vireo_lanes::{FlatListVisibilityManager, Renderer, ShadowMapStage, StandardPipelineStage};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

const LIT: Pipeline = Pipeline::graphics(PipelineId(1));
const GLASS: Pipeline = Pipeline::graphics(PipelineId(2));
const DEPTH_ONLY: Pipeline = Pipeline::graphics(PipelineId(3));

/// A unit cube, opaque or translucent.
struct Cube {
    center: Vec3,
    translucent: bool,
}

impl RenderItem for Cube {
    fn render(&self, context: &mut dyn RenderContext, stage: &str) -> Result<(), RenderError> {
        let recorder = context.recorder();
        let pipeline = match (stage, self.translucent) {
            (SHADOW_MAP_STAGE, _) => DEPTH_ONLY,
            (_, true) => GLASS,
            (_, false) => LIT,
        };
        recorder.set_pipeline(pipeline)?;
        recorder.draw(36, 1, 0, 0)
    }

    fn stages(&self) -> &[&'static str] {
        if self.translucent {
            &[STANDARD_STAGE]
        } else {
            &[STANDARD_STAGE, SHADOW_MAP_STAGE]
        }
    }

    fn bounds(&self) -> Option<Aabb> {
        Some(Aabb::from_center_half_extents(self.center, Vec3::new(0.5, 0.5, 0.5)))
    }

    fn render_order_key(&self, view_position: Vec3) -> RenderOrderKey {
        if self.translucent {
            RenderOrderKey::translucent(self.center, view_position, GLASS.id.0 as u32)
        } else {
            RenderOrderKey::opaque(self.center, view_position, LIT.id.0 as u32)
        }
    }
}

fn load_settings() -> Result<RenderSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading render settings from '{path}'"))?;
            RenderSettings::from_json_str(&json)
                .with_context(|| format!("parsing render settings from '{path}'"))
        }
        None => Ok(RenderSettings::default()),
    }
}

fn build_scene() -> FlatListVisibilityManager {
    let mut visibility = FlatListVisibilityManager::new();
    for x in -2..=2 {
        for z in -2..=2 {
            let translucent = (x + z) % 3 == 0;
            visibility.add_item(Arc::new(Cube {
                center: Vec3::new(x as f32 * 2.0, 0.0, z as f32 * 2.0 - 8.0),
                translucent,
            }));
        }
    }
    visibility
}

fn camera_frustum(eye: Vec3, target: Vec3) -> Result<Frustum> {
    let view = Mat4::look_at_rh(eye, target, Vec3::Y).context("degenerate camera orientation")?;
    let proj = Mat4::perspective_rh_zo(FRAC_PI_4, WIDTH as f32 / HEIGHT as f32, 0.1, 100.0);
    Ok(Frustum::from_view_projection(&(proj * view)))
}

fn light_frustum(light: Vec3) -> Result<Frustum> {
    let view = Mat4::look_at_rh(light, Vec3::new(0.0, 0.0, -8.0), Vec3::Y)
        .context("degenerate light orientation")?;
    let proj = Mat4::orthographic_rh_zo(-12.0, 12.0, -12.0, 12.0, 0.1, 60.0);
    Ok(Frustum::from_view_projection(&(proj * view)))
}

fn replay_frame(
    context: &Mutex<RecordingContext>,
    renderer: &mut Renderer,
    visibility: &FlatListVisibilityManager,
    eye: Vec3,
    upload: bool,
    executor: &mut TraceExecutor,
) -> Result<usize> {
    let lock = move || {
        context
            .lock()
            .map_err(|_| anyhow!("render context lock poisoned"))
    };

    {
        let mut ctx = lock()?;
        ctx.begin_frame();
        if upload {
            // Regenerate the atlas mip chain once, before anything samples it.
            ctx.recorder().generate_mipmaps(TextureId(100))?;
        }
    }

    renderer.render_frame(visibility, eye)?;

    let ticket = lock()?.end_frame()?;
    executor.clear();
    lock()?.log().replay_ticket(ticket, executor)?;
    Ok(ticket.len())
}

fn main() -> Result<()> {
    init_logging()?;
    let settings = load_settings()?;
    log::info!("Sandbox: using {settings:?}");

    let swapchain = Framebuffer::color(FramebufferId(0), WIDTH, HEIGHT, 1).with_depth(true);
    let (context, shared) = RecordingContext::new(swapchain, &settings).into_shared();
    let visibility = build_scene();

    let mut shadow = ShadowMapStage::with_size(
        &shared,
        FramebufferId(1),
        DEFAULT_SHADOW_MAP_SIZE,
        DEFAULT_SHADOW_MAP_SIZE,
        &settings,
    );
    let light = Vec3::new(10.0, 20.0, 0.0);
    shadow.set_light_position(light);
    shadow.set_light_frustum(Some(light_frustum(light)?));
    let mut renderer = Renderer::new(Arc::clone(&shared))
        .with_stage(shadow)
        .with_stage(StandardPipelineStage::with_settings(
            STANDARD_STAGE,
            &shared,
            &settings,
        ));

    let mut executor = TraceExecutor::new();
    let target = Vec3::new(0.0, 0.0, -8.0);

    for frame in 0..3u32 {
        let eye = Vec3::new(frame as f32 * 3.0 - 3.0, 3.0, 4.0);
        let frustum = camera_frustum(eye, target)?;
        renderer
            .stage_as_mut::<StandardPipelineStage>(STANDARD_STAGE)
            .context("standard stage missing")?
            .set_frustum(Some(frustum));

        let commands = replay_frame(
            &context,
            &mut renderer,
            &visibility,
            eye,
            frame == 0,
            &mut executor,
        )?;
        let draws = executor
            .kinds()
            .into_iter()
            .filter(|kind| *kind == CommandKind::Draw)
            .count();
        log::info!("Sandbox: frame {frame} replayed {commands} command(s), {draws} draw(s)");
    }

    Ok(())
}
