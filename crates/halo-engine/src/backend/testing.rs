//! In-memory backend that records every call, for pipeline tests.

use std::collections::{HashMap, HashSet};

use super::{Backend, Sprite, Submit, TextMeasure, TextureHandle, TextureLoader};
use crate::config::SampleDesc;
use crate::coords::{Vec2, Viewport};
use crate::error::BackendError;
use crate::paint::Color;
use crate::render::{Topology, Vertex};
use crate::texture::TextureOrigin;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateDevice(u32, u32),
    CreateRenderTarget,
    ReleaseRenderTarget,
    CreatePipeline(SampleDesc),
    CreateVertexBuffer(usize),
    ReleaseVertexBuffer,
    SetViewport(Viewport),
    CreateProjection,
    ReleaseProjection,
    LoadFont,
    ResizeBuffers(u32, u32),
    SetFullscreen(bool),
    RecreateSwapchain(SampleDesc, u32),
    BeginFrame,
    BindGeometry,
    BeginSprites,
    EndSprites,
    RestoreBlend,
    Present(u32),

    WriteVertices(usize),
    Draw(Topology, u32, u32),
    Text(String, Vec2, Color, f32),
    Sprite(TextureHandle, Sprite),

    LoadTexture(String),
    ReleaseTexture(TextureHandle),
}

#[derive(Debug)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    /// Names of operations that should fail (`"create_device"`, `"load_texture"`, ...).
    pub failing: HashSet<&'static str>,
    /// Texture sources whose loads fail while every other source succeeds.
    pub missing: HashSet<String>,
    pub texture_loads: usize,
    pub textures: HashMap<TextureHandle, (u32, u32)>,
    pub surface: (u32, u32),
    /// Highest sample count the fake device supports.
    pub max_samples: u32,
    next_texture: u32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            failing: HashSet::new(),
            missing: HashSet::new(),
            texture_loads: 0,
            textures: HashMap::new(),
            surface: (0, 0),
            max_samples: 8,
            next_texture: 0,
        }
    }
}

impl RecordingBackend {
    pub fn fail(&mut self, op: &'static str) {
        self.failing.insert(op);
    }

    pub fn heal(&mut self, op: &'static str) {
        self.failing.remove(op);
    }

    fn check(&self, op: &'static str) -> Result<(), BackendError> {
        if self.failing.contains(op) {
            Err(BackendError::Fatal(format!("injected failure: {op}")))
        } else {
            Ok(())
        }
    }

    /// Calls recorded since the last `Present`, or all of them.
    pub fn frame_calls(&self) -> &[Call] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::BeginFrame))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Submit for RecordingBackend {
    fn write_vertices(&mut self, vertices: &[Vertex]) -> Result<(), BackendError> {
        self.calls.push(Call::WriteVertices(vertices.len()));
        self.check("write_vertices")
    }

    fn draw(&mut self, topology: Topology, count: u32, first: u32) {
        self.calls.push(Call::Draw(topology, count, first));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        self.calls.push(Call::Text(text.to_owned(), pos, color, scale));
    }

    fn draw_sprite(&mut self, texture: TextureHandle, sprite: &Sprite) {
        self.calls.push(Call::Sprite(texture, *sprite));
    }
}

impl TextMeasure for RecordingBackend {
    fn measure_text(&self, text: &str, ignore_whitespace: bool) -> Vec2 {
        let n = if ignore_whitespace {
            text.chars().filter(|c| !c.is_whitespace()).count()
        } else {
            text.chars().count()
        };
        Vec2::new(8.0 * n as f32, 16.0)
    }
}

impl TextureLoader for RecordingBackend {
    fn load_texture(&mut self, origin: &TextureOrigin) -> Result<TextureHandle, BackendError> {
        self.calls.push(Call::LoadTexture(origin.to_string()));
        self.texture_loads += 1;
        self.check("load_texture")?;
        if self.missing.contains(&origin.to_string()) {
            return Err(BackendError::Texture(format!("no such texture: {origin}")));
        }

        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(handle, (64, 32));
        Ok(handle)
    }

    fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture).copied()
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::ReleaseTexture(texture));
        self.textures.remove(&texture);
    }
}

impl Backend for RecordingBackend {
    fn create_device(
        &mut self,
        width: u32,
        height: u32,
        _samples: SampleDesc,
        _sync_interval: u32,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::CreateDevice(width, height));
        self.check("create_device")?;
        self.surface = (width, height);
        Ok(())
    }

    fn create_render_target(&mut self) -> Result<(u32, u32), BackendError> {
        self.calls.push(Call::CreateRenderTarget);
        self.check("create_render_target")?;
        Ok(self.surface)
    }

    fn release_render_target(&mut self) {
        self.calls.push(Call::ReleaseRenderTarget);
    }

    fn create_pipeline(&mut self, samples: SampleDesc) -> Result<SampleDesc, BackendError> {
        self.calls.push(Call::CreatePipeline(samples));
        self.check("create_pipeline")?;
        if samples.count <= self.max_samples {
            return Ok(samples);
        }
        // Largest power of two the "device" supports below the request.
        let count = [16, 8, 4, 2]
            .into_iter()
            .find(|&n| n <= self.max_samples && n <= samples.count)
            .unwrap_or(1);
        Ok(SampleDesc::new(count, 0))
    }

    fn create_vertex_buffer(&mut self, max_vertices: usize) -> Result<(), BackendError> {
        self.calls.push(Call::CreateVertexBuffer(max_vertices));
        self.check("create_vertex_buffer")
    }

    fn release_vertex_buffer(&mut self) {
        self.calls.push(Call::ReleaseVertexBuffer);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(Call::SetViewport(viewport));
    }

    fn create_projection(&mut self, _matrix: [[f32; 4]; 4]) -> Result<(), BackendError> {
        self.calls.push(Call::CreateProjection);
        self.check("create_projection")
    }

    fn release_projection(&mut self) {
        self.calls.push(Call::ReleaseProjection);
    }

    fn load_font(&mut self, _font: &[u8]) -> Result<(), BackendError> {
        self.calls.push(Call::LoadFont);
        self.check("load_font")
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.calls.push(Call::ResizeBuffers(width, height));
        self.check("resize_buffers")?;
        self.surface = (width, height);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        self.calls.push(Call::SetFullscreen(fullscreen));
        self.check("set_fullscreen")
    }

    fn recreate_swapchain(
        &mut self,
        samples: SampleDesc,
        sync_interval: u32,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::RecreateSwapchain(samples, sync_interval));
        self.check("recreate_swapchain")
    }

    fn begin_frame(&mut self, _clear: Color) -> Result<(), BackendError> {
        self.calls.push(Call::BeginFrame);
        self.check("begin_frame")
    }

    fn bind_geometry_state(&mut self) {
        self.calls.push(Call::BindGeometry);
    }

    fn begin_sprites(&mut self) {
        self.calls.push(Call::BeginSprites);
    }

    fn end_sprites(&mut self) {
        self.calls.push(Call::EndSprites);
    }

    fn restore_blend_state(&mut self) {
        self.calls.push(Call::RestoreBlend);
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError> {
        self.calls.push(Call::Present(sync_interval));
        self.check("present")
    }
}
