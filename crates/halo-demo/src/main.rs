//! Heads-up overlay demo.
//!
//! Usage: `halo-demo [sprite image] [click sound .wav]`
//!
//! Keys (while the overlay holds input): F8 toggles the input lock, F9 cycles
//! vsync, F10 toggles fullscreen, Escape quits.

use std::path::PathBuf;

use anyhow::Result;

use halo_engine::audio::SoundId;
use halo_engine::backend::gpu::GpuBackend;
use halo_engine::config::{OverlayConfig, SampleDesc};
use halo_engine::coords::{Rect, Vec2};
use halo_engine::core::{AppControl, FrameCtx, OverlayApp};
use halo_engine::input::Key;
use halo_engine::logging::{LoggingConfig, init_logging};
use halo_engine::paint::Color;
use halo_engine::renderer::Renderer;
use halo_engine::texture::TextureId;
use halo_engine::window::Runtime;

const PANEL: Rect = Rect::new(16.0, 16.0, 260.0, 92.0);
const ACCENT: Color = Color::new(0.2, 0.85, 1.0, 1.0);

struct Hud {
    sprite_path: Option<PathBuf>,
    sound_path: Option<PathBuf>,
    sprite: TextureId,
    click: SoundId,
    fps: f32,
    was_left: bool,
}

impl Hud {
    fn new(sprite_path: Option<PathBuf>, sound_path: Option<PathBuf>) -> Self {
        Self {
            sprite_path,
            sound_path,
            sprite: TextureId::INVALID,
            click: SoundId::INVALID,
            fps: 0.0,
            was_left: false,
        }
    }

    fn handle_keys(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input.key_pressed(Key::Function(8)) {
            if ctx.window.is_click_through() {
                ctx.window.input_lock();
            } else {
                ctx.window.release_input_lock();
            }
        }
        if ctx.input.key_pressed(Key::Function(9)) {
            let next = (ctx.renderer.vsync() + 1) % 4;
            let result = if next == 0 {
                ctx.renderer.disable_vsync()
            } else {
                ctx.renderer.set_vsync(next)
            };
            if let Err(e) = result {
                log::warn!("vsync change failed: {e}");
            }
        }
        if ctx.input.key_pressed(Key::Function(10)) {
            let fullscreen = !ctx.renderer.is_fullscreen();
            if let Err(e) = ctx.renderer.window_fullscreen(fullscreen) {
                log::warn!("fullscreen toggle failed: {e}");
            }
        }
        AppControl::Continue
    }

    fn draw_panel(&self, ctx: &mut FrameCtx<'_>) {
        let vsync = ctx.renderer.vsync();
        let samples = ctx.renderer.samples().count;
        let pointer = ctx.input.pointer();
        let locked = !ctx.window.is_click_through();

        let bg = ctx.background();
        bg.draw_filled_rect_gradient(PANEL, Color::rgb8(20, 24, 32).with_alpha(0.85), 0.6);
        bg.draw_rect_stroked_two_tone(PANEL, 2.0, ACCENT, Color::BLACK);

        let fg = ctx.foreground();
        let x = PANEL.x + 10.0;
        fg.draw_outlined_string(&format!("{:.0} fps", self.fps), Vec2::new(x, PANEL.y + 8.0), ACCENT, 1.0);
        fg.draw_string(
            &format!("vsync {vsync}  msaa x{samples}"),
            Vec2::new(x, PANEL.y + 30.0),
            Color::WHITE,
            0.9,
        );
        fg.draw_string(
            &format!("pointer {:.0}, {:.0}", pointer.x, pointer.y),
            Vec2::new(x, PANEL.y + 50.0),
            Color::WHITE,
            0.9,
        );
        let lock = if locked { "input locked (F8)" } else { "click-through (F8)" };
        fg.draw_string(lock, Vec2::new(x, PANEL.y + 70.0), Color::rgb8(180, 180, 180), 0.8);
    }

    fn draw_reticle(&self, ctx: &mut FrameCtx<'_>) {
        let center = ctx.viewport().center();
        let pointer = ctx.input.pointer();

        let fg = ctx.foreground();
        fg.draw_smooth_circle::<48>(center, 40.0, ACCENT.with_alpha(0.8));
        fg.draw_smooth_filled_circle::<16>(center, 3.0, Color::RED);
        fg.draw_line(center - Vec2::new(56.0, 0.0), center - Vec2::new(44.0, 0.0), ACCENT);
        fg.draw_line(center + Vec2::new(44.0, 0.0), center + Vec2::new(56.0, 0.0), ACCENT);
        fg.draw_thick_line(center - Vec2::new(0.0, 56.0), center - Vec2::new(0.0, 44.0), 2.0, ACCENT);
        fg.draw_arrow(pointer, 60.0, Color::GREEN);

        let marker = Rect::new(pointer.x - 6.0, pointer.y - 6.0, 12.0, 12.0);
        fg.draw_outlined_filled_rect(marker, 1.0, Color::GREEN.with_alpha(0.4), Color::BLACK);
        fg.draw_filled_triangle(
            Vec2::new(pointer.x, pointer.y - 14.0),
            Vec2::new(pointer.x + 5.0, pointer.y - 8.0),
            Vec2::new(pointer.x - 5.0, pointer.y - 8.0),
            Color::GREEN,
        );
    }
}

impl OverlayApp for Hud {
    fn on_start(&mut self, renderer: &mut Renderer<GpuBackend>) {
        if let Some(path) = self.sprite_path.as_deref() {
            self.sprite = renderer.add_texture(path);
        }
        if let Some(path) = self.sound_path.as_deref() {
            self.click = renderer.add_sound_effect(path);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.time.dt > 0.0 {
            self.fps = self.fps * 0.9 + (1.0 / ctx.time.dt) * 0.1;
        }
        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        let left = ctx.input.left_down();
        if left && !self.was_left {
            let pan = (ctx.input.pointer().x / ctx.viewport().width) * 2.0 - 1.0;
            ctx.renderer.play_sound_effect(self.click, 0.8, 0.0, pan);
        }
        self.was_left = left;

        self.draw_panel(ctx);
        self.draw_reticle(ctx);

        if let Some(half) = ctx.renderer.get_texture_size(self.sprite) {
            let pos = ctx.input.pointer() - half;
            ctx.renderer.draw_texture(pos, Color::WHITE, self.sprite, 1.0);
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let sprite = args.next();
    let sound = args.next();

    let config = OverlayConfig {
        title: "halo".to_string(),
        samples: SampleDesc::new(4, 0),
        ..OverlayConfig::default()
    };

    Runtime::run(config, Hud::new(sprite, sound))
}
