//! The narrow contract between the frame pipeline and a GPU implementation.
//!
//! Render lists and the texture manager only see [`Submit`] (and
//! [`TextMeasure`] for layout queries). The renderer drives the full
//! [`Backend`] lifecycle: device and surface creation, pipeline state,
//! resize teardown/rebuild, and presentation.
//!
//! The production implementation lives in [`gpu`]; tests use
//! `testing::RecordingBackend`.

#[cfg(test)]
pub(crate) mod testing;
pub mod gpu;

use crate::config::SampleDesc;
use crate::coords::{Vec2, Viewport};
use crate::error::BackendError;
use crate::paint::Color;
use crate::render::{Topology, Vertex};
use crate::texture::TextureOrigin;

/// Backend-owned texture resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u32);

/// One textured quad, drawn from the top-left at `pos`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub scale: f32,
    pub tint: Color,
}

/// Per-frame submission: what render lists and the texture queue emit.
pub trait Submit {
    /// Replaces the current vertex upload. Subsequent `draw` offsets index into it.
    fn write_vertices(&mut self, vertices: &[Vertex]) -> Result<(), BackendError>;

    /// Draws `count` vertices starting at `first` of the last upload.
    fn draw(&mut self, topology: Topology, count: u32, first: u32);

    /// Draws a run of text with its top-left at `pos`.
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color, scale: f32);

    /// Draws one textured quad. Only valid between `begin_sprites`/`end_sprites`.
    fn draw_sprite(&mut self, texture: TextureHandle, sprite: &Sprite);
}

/// Text layout queries.
pub trait TextMeasure {
    /// Extent of `text` at scale 1. With `ignore_whitespace` the box hugs the inked glyphs.
    fn measure_text(&self, text: &str, ignore_whitespace: bool) -> Vec2;
}

/// Texture resource management.
pub trait TextureLoader {
    fn load_texture(&mut self, origin: &TextureOrigin) -> Result<TextureHandle, BackendError>;

    /// Native pixel size, `None` for an unknown handle.
    fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)>;

    fn release_texture(&mut self, texture: TextureHandle);
}

/// The full device lifecycle the renderer drives.
///
/// Initialization order is `create_device`, `create_render_target`,
/// `create_pipeline`, `create_vertex_buffer`, `set_viewport`,
/// `create_projection`, `load_font`. Every `create_*` has a matching
/// `release_*` used by the resize protocol.
pub trait Backend: Submit + TextMeasure + TextureLoader {
    /// Creates the device and swapchain for a `width × height` surface.
    fn create_device(
        &mut self,
        width: u32,
        height: u32,
        samples: SampleDesc,
        sync_interval: u32,
    ) -> Result<(), BackendError>;

    /// Acquires the back-buffer view. Returns the actual surface size.
    fn create_render_target(&mut self) -> Result<(u32, u32), BackendError>;
    fn release_render_target(&mut self);

    /// Builds shaders, input layout, blend and rasterizer state.
    ///
    /// Returns the sample description actually in effect. An unsupported count
    /// falls back to the largest supported count below it, down to 1.
    fn create_pipeline(&mut self, samples: SampleDesc) -> Result<SampleDesc, BackendError>;

    /// Allocates the shared dynamic vertex buffer.
    fn create_vertex_buffer(&mut self, max_vertices: usize) -> Result<(), BackendError>;
    fn release_vertex_buffer(&mut self);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Uploads the projection matrix (column-major).
    fn create_projection(&mut self, matrix: [[f32; 4]; 4]) -> Result<(), BackendError>;
    fn release_projection(&mut self);

    /// Replaces the text font.
    fn load_font(&mut self, font: &[u8]) -> Result<(), BackendError>;

    /// Resizes the swapchain buffers. Render target must be released first.
    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Switches between exclusive fullscreen and windowed presentation.
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError>;

    /// Recreates the swapchain with new sampling/present settings.
    fn recreate_swapchain(
        &mut self,
        samples: SampleDesc,
        sync_interval: u32,
    ) -> Result<(), BackendError>;

    /// Acquires the next frame and clears it.
    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError>;

    /// Rebinds vertex buffer, topology, shaders, projection, blend and rasterizer state.
    fn bind_geometry_state(&mut self);

    fn begin_sprites(&mut self);
    fn end_sprites(&mut self);

    /// Restores the straight-alpha blend state after sprite/text batches.
    fn restore_blend_state(&mut self);

    /// Presents the frame. `sync_interval = 0` presents immediately.
    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError>;
}
