//! Renderer core: owns the backend and the three per-frame accumulators.
//!
//! Lifecycle:
//! - [`Renderer::initialize`] runs the ordered device/pipeline setup; any failing
//!   step leaves the renderer `Failed` (terminal).
//! - [`Renderer::begin`] / [`Renderer::end`] bracket a frame. Drawing calls only
//!   append to the background/foreground [`RenderList`]s and the texture queue.
//! - Resize, fullscreen, vsync, antialiasing and font changes tear down and
//!   rebuild backend state with the `resizing` guard raised; `begin` is a
//!   no-op while it is set.

mod frame;
mod init;
mod resize;

use crate::audio::{AudioManager, AudioSink, SoundId, SoundSource};
use crate::backend::Backend;
use crate::config::{OverlayConfig, SampleDesc, clamp_sync_interval};
use crate::coords::{Vec2, Viewport};
use crate::error::TextureError;
use crate::paint::Color;
use crate::render::{MAX_VERTICES, RenderList};
use crate::texture::{TextureId, TextureManager, TextureOrigin};

/// Surface lifecycle state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    Initializing,
    Ready,
    /// A resize/rebuild failed; a later successful resize restores `Ready`.
    Lost,
    /// Initialization failed. Terminal.
    Failed,
}

pub struct Renderer<B: Backend> {
    backend: B,

    background: RenderList,
    foreground: RenderList,
    textures: TextureManager,
    audio: AudioManager,

    state: RendererState,
    resizing: bool,
    frame_active: bool,

    viewport: Viewport,
    vsync: u32,
    samples: SampleDesc,
    fullscreen: bool,
    clear_color: Color,
    font: Option<Vec<u8>>,
}

impl<B: Backend> Renderer<B> {
    pub fn new(backend: B, config: &OverlayConfig, sink: Box<dyn AudioSink>) -> Self {
        let viewport = Viewport::from_size(config.width, config.height);
        Self {
            backend,
            background: RenderList::new(viewport),
            foreground: RenderList::new(viewport),
            textures: TextureManager::new(),
            audio: AudioManager::new(sink),
            state: RendererState::Uninitialized,
            resizing: false,
            frame_active: false,
            viewport,
            vsync: if config.vsync == 0 { 0 } else { clamp_sync_interval(config.vsync) },
            samples: config.samples,
            fullscreen: config.fullscreen,
            clear_color: config.clear_color,
            font: config.resolve_font(),
        }
    }

    #[inline]
    pub fn state(&self) -> RendererState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == RendererState::Ready
    }

    #[inline]
    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn vsync(&self) -> u32 {
        self.vsync
    }

    #[inline]
    pub fn samples(&self) -> SampleDesc {
        self.samples
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Layer drawn first, below textures.
    #[inline]
    pub fn background(&mut self) -> &mut RenderList {
        &mut self.background
    }

    /// Layer drawn after the background, with textures and text on top.
    #[inline]
    pub fn foreground(&mut self) -> &mut RenderList {
        &mut self.foreground
    }

    #[inline]
    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    #[inline]
    pub fn audio(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ---- textures ----

    pub fn try_add_texture(
        &mut self,
        origin: impl Into<TextureOrigin>,
    ) -> Result<TextureId, TextureError> {
        self.textures.try_add_texture(&mut self.backend, origin)
    }

    pub fn add_texture(&mut self, origin: impl Into<TextureOrigin>) -> TextureId {
        self.textures.add_texture(&mut self.backend, origin)
    }

    pub fn draw_texture(&mut self, pos: Vec2, color: Color, id: TextureId, scale: f32) {
        self.textures.draw_texture(pos, color, id, scale);
    }

    /// Half extents of a registered texture.
    pub fn get_texture_size(&self, id: TextureId) -> Option<Vec2> {
        self.textures.get_texture_size(&self.backend, id)
    }

    pub fn clamp_texture_buffer(&mut self) {
        self.textures.clamp_texture_buffer(&mut self.backend);
    }

    pub fn clear_all_textures(&mut self) {
        self.textures.clear_all_textures(&mut self.backend);
    }

    // ---- audio ----

    pub fn add_sound_effect<'a>(&mut self, source: impl Into<SoundSource<'a>>) -> SoundId {
        self.audio.add_sound_effect(source)
    }

    pub fn play_sound_effect(&mut self, id: SoundId, volume: f32, pitch: f32, pan: f32) {
        self.audio.play_sound_effect(id, volume, pitch, pan);
    }

    // ---- text ----

    /// Extent of `text` in the current font.
    pub fn measure_string(&self, text: &str, ignore_whitespace: bool) -> Vec2 {
        self.foreground
            .measure_string(&self.backend, text, ignore_whitespace)
    }

    fn clamp_vsync(&mut self, interval: u32) {
        self.vsync = clamp_sync_interval(interval);
    }
}

/// Vertex capacity of the shared buffer: both lists are uploaded each frame.
pub(crate) const SHARED_VERTICES: usize = MAX_VERTICES * 2;

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::audio::NullSink;
    use crate::backend::testing::RecordingBackend;

    pub fn config(width: u32, height: u32) -> OverlayConfig {
        OverlayConfig {
            width,
            height,
            font: Some(vec![0u8; 4]),
            ..OverlayConfig::default()
        }
    }

    pub fn renderer(width: u32, height: u32) -> Renderer<RecordingBackend> {
        Renderer::new(
            RecordingBackend::default(),
            &config(width, height),
            Box::new(NullSink),
        )
    }

    pub fn ready(width: u32, height: u32) -> Renderer<RecordingBackend> {
        let mut r = renderer(width, height);
        r.initialize(width, height).expect("initialize");
        r.backend_mut().calls.clear();
        r
    }
}
