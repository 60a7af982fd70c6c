//! wgpu implementation of the backend contract.
//!
//! Submissions during a frame are recorded, not executed: vertex uploads are
//! appended to one staging array, sprite and glyph quads to another, and each
//! draw becomes a [`FrameOp`]. `present` uploads both arrays (growing the GPU
//! buffers when needed), replays the ops in a single render pass and presents.
//!
//! Pipelines carry their own blend/raster state, so `bind_geometry_state` and
//! `restore_blend_state` have nothing to rebind here.

mod atlas;
mod buffers;
mod context;
mod pipelines;
mod textures;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::{Fullscreen, Window};

use crate::backend::{Backend, Sprite, Submit, TextMeasure, TextureHandle, TextureLoader};
use crate::config::SampleDesc;
use crate::coords::{Vec2, Viewport};
use crate::error::BackendError;
use crate::paint::Color;
use crate::render::{Topology, Vertex};
use crate::texture::TextureOrigin;

use atlas::GlyphAtlas;
use buffers::{DynamicBuffer, ProjectionUniform};
use context::{GpuContext, SurfaceErrorAction};
use pipelines::{Pipelines, QUAD_CORNERS, QUAD_INDICES, SpriteInstance, create_msaa_view};
use textures::TextureStore;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SpriteSource {
    Atlas,
    Texture(TextureHandle),
}

#[derive(Debug, Copy, Clone)]
enum FrameOp {
    Geometry {
        topology: Topology,
        first: u32,
        count: u32,
    },
    Sprites {
        source: SpriteSource,
        first: u32,
        count: u32,
    },
}

struct AcquiredFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

pub struct GpuBackend {
    window: Arc<Window>,

    ctx: Option<GpuContext>,
    pipelines: Option<Pipelines>,
    msaa: Option<wgpu::TextureView>,
    projection: Option<ProjectionUniform>,
    quad: Option<(wgpu::Buffer, wgpu::Buffer)>,
    vertex_buffer: DynamicBuffer,
    instance_buffer: DynamicBuffer,
    atlas: GlyphAtlas,
    textures: TextureStore,
    viewport: Viewport,
    sync_interval: u32,

    frame: Option<AcquiredFrame>,
    clear: Color,
    ops: Vec<FrameOp>,
    vertices: Vec<Vertex>,
    upload_base: u32,
    instances: Vec<SpriteInstance>,
    in_sprite_batch: bool,
}

impl GpuBackend {
    /// Creates an uninitialized backend bound to `window`. The renderer's
    /// `initialize` creates the device.
    pub fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        Self {
            window,
            ctx: None,
            pipelines: None,
            msaa: None,
            projection: None,
            quad: None,
            vertex_buffer: DynamicBuffer::new("halo vertex buffer", wgpu::BufferUsages::VERTEX),
            instance_buffer: DynamicBuffer::new(
                "halo sprite instance buffer",
                wgpu::BufferUsages::VERTEX,
            ),
            atlas: GlyphAtlas::default(),
            textures: TextureStore::default(),
            viewport: Viewport::from_size(size.width, size.height),
            sync_interval: 0,
            frame: None,
            clear: Color::TRANSPARENT,
            ops: Vec::new(),
            vertices: Vec::new(),
            upload_base: 0,
            instances: Vec::new(),
            in_sprite_batch: false,
        }
    }

    #[inline]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn ctx(&self) -> Result<&GpuContext, BackendError> {
        self.ctx.as_ref().ok_or(BackendError::NotReady("device"))
    }

    fn push_sprites(&mut self, source: SpriteSource, first: u32, count: u32) {
        if count == 0 {
            return;
        }
        if let Some(FrameOp::Sprites {
            source: last_source,
            first: last_first,
            count: last_count,
        }) = self.ops.last_mut()
            && *last_source == source
            && *last_first + *last_count == first
        {
            *last_count += count;
            return;
        }
        self.ops.push(FrameOp::Sprites {
            source,
            first,
            count,
        });
    }

    fn reset_frame_data(&mut self) {
        self.ops.clear();
        self.vertices.clear();
        self.instances.clear();
        self.upload_base = 0;
        self.in_sprite_batch = false;
    }

    fn encode_and_present(&mut self, frame: AcquiredFrame) -> Result<(), BackendError> {
        let ctx = self.ctx.as_ref().ok_or(BackendError::NotReady("device"))?;
        let pipelines = self
            .pipelines
            .as_ref()
            .ok_or(BackendError::NotReady("pipeline"))?;
        let projection = self
            .projection
            .as_ref()
            .ok_or(BackendError::NotReady("projection"))?;
        let (quad_vbo, quad_ibo) = self
            .quad
            .as_ref()
            .ok_or(BackendError::NotReady("vertex buffer"))?;

        self.vertex_buffer.write(ctx, &self.vertices);
        self.instance_buffer.write(ctx, &self.instances);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("halo frame encoder"),
            });

        {
            let (view, resolve_target) = match &self.msaa {
                Some(msaa) => (msaa, Some(&frame.view)),
                None => (&frame.view, None),
            };
            let [r, g, b, a] = self.clear.to_array();

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("halo frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (sw, sh) = ctx.size();
            rpass.set_viewport(
                0.0,
                0.0,
                self.viewport.width.min(sw as f32),
                self.viewport.height.min(sh as f32),
                0.0,
                1.0,
            );
            rpass.set_bind_group(0, &projection.bind_group, &[]);

            for op in &self.ops {
                match *op {
                    FrameOp::Geometry {
                        topology,
                        first,
                        count,
                    } => {
                        let Some(vb) = self.vertex_buffer.buffer() else {
                            continue;
                        };
                        rpass.set_pipeline(pipelines.geometry(topology));
                        rpass.set_vertex_buffer(0, vb.slice(..));
                        rpass.draw(first..first + count, 0..1);
                    }
                    FrameOp::Sprites {
                        source,
                        first,
                        count,
                    } => {
                        let bind_group = match source {
                            SpriteSource::Atlas => self.atlas.bind_group(),
                            SpriteSource::Texture(h) => self.textures.get(h).map(|t| &t.bind_group),
                        };
                        let (Some(bind_group), Some(ib)) =
                            (bind_group, self.instance_buffer.buffer())
                        else {
                            continue;
                        };
                        rpass.set_pipeline(&pipelines.sprite);
                        rpass.set_bind_group(1, bind_group, &[]);
                        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
                        rpass.set_vertex_buffer(1, ib.slice(..));
                        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
                        rpass.draw_indexed(0..6, 0, first..first + count);
                    }
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
        Ok(())
    }
}

impl Submit for GpuBackend {
    fn write_vertices(&mut self, vertices: &[Vertex]) -> Result<(), BackendError> {
        if self.frame.is_none() {
            return Err(BackendError::NotReady("no frame in flight"));
        }
        self.upload_base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    fn draw(&mut self, topology: Topology, count: u32, first: u32) {
        self.ops.push(FrameOp::Geometry {
            topology,
            first: self.upload_base + first,
            count,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        let first = self.instances.len() as u32;
        let count = self
            .atlas
            .layout_text(ctx, text, pos, color, scale, &mut self.instances);
        self.push_sprites(SpriteSource::Atlas, first, count as u32);
    }

    fn draw_sprite(&mut self, texture: TextureHandle, sprite: &Sprite) {
        if !self.in_sprite_batch {
            log::debug!("gpu: sprite outside a sprite batch ignored");
            return;
        }
        let Some(tex) = self.textures.get(texture) else {
            return;
        };
        let (w, h) = tex.size;
        let first = self.instances.len() as u32;
        self.instances.push(SpriteInstance {
            dst_min: [sprite.pos.x, sprite.pos.y],
            dst_max: [
                sprite.pos.x + w as f32 * sprite.scale,
                sprite.pos.y + h as f32 * sprite.scale,
            ],
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            color: sprite.tint.to_array(),
            mask: 0.0,
        });
        self.push_sprites(SpriteSource::Texture(texture), first, 1);
    }
}

impl TextMeasure for GpuBackend {
    fn measure_text(&self, text: &str, ignore_whitespace: bool) -> Vec2 {
        self.atlas.measure(text, ignore_whitespace)
    }
}

impl TextureLoader for GpuBackend {
    fn load_texture(&mut self, origin: &TextureOrigin) -> Result<TextureHandle, BackendError> {
        let ctx = self.ctx.as_ref().ok_or(BackendError::NotReady("device"))?;
        self.textures.load(ctx, origin)
    }

    fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(texture).map(|t| t.size)
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.textures.release(texture);
    }
}

impl Backend for GpuBackend {
    fn create_device(
        &mut self,
        width: u32,
        height: u32,
        _samples: SampleDesc,
        sync_interval: u32,
    ) -> Result<(), BackendError> {
        let ctx = pollster::block_on(GpuContext::new(
            self.window.clone(),
            width,
            height,
            sync_interval,
        ))?;
        // Resources from a previous device cannot be used with the new one.
        self.atlas.release();
        self.textures = TextureStore::default();
        self.ctx = Some(ctx);
        self.sync_interval = sync_interval;
        Ok(())
    }

    fn create_render_target(&mut self) -> Result<(u32, u32), BackendError> {
        let ctx = self.ctx()?;
        let size = ctx.size();
        self.msaa = self
            .pipelines
            .as_ref()
            .and_then(|p| create_msaa_view(ctx, p.sample_count));
        Ok(size)
    }

    fn release_render_target(&mut self) {
        self.frame = None;
        self.msaa = None;
        self.reset_frame_data();
    }

    fn create_pipeline(&mut self, samples: SampleDesc) -> Result<SampleDesc, BackendError> {
        let ctx = self.ctx()?;
        let count = ctx.supported_samples(samples.count.max(1));
        let pipelines = Pipelines::new(ctx, count);
        self.msaa = create_msaa_view(ctx, count);
        self.pipelines = Some(pipelines);

        if count == samples.count {
            Ok(samples)
        } else {
            Ok(SampleDesc::new(count, 0))
        }
    }

    fn create_vertex_buffer(&mut self, max_vertices: usize) -> Result<(), BackendError> {
        let ctx = self.ctx.as_ref().ok_or(BackendError::NotReady("device"))?;
        self.vertex_buffer.reserve(
            &ctx.device,
            (max_vertices * std::mem::size_of::<Vertex>()) as u64,
        );
        if self.quad.is_none() {
            let vbo = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("halo quad vbo"),
                    contents: bytemuck::cast_slice(&QUAD_CORNERS),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let ibo = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("halo quad ibo"),
                    contents: bytemuck::cast_slice(&QUAD_INDICES),
                    usage: wgpu::BufferUsages::INDEX,
                });
            self.quad = Some((vbo, ibo));
        }
        Ok(())
    }

    fn release_vertex_buffer(&mut self) {
        self.vertex_buffer.release();
        self.instance_buffer.release();
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn create_projection(&mut self, matrix: [[f32; 4]; 4]) -> Result<(), BackendError> {
        let ctx = self.ctx()?;
        self.projection = Some(ProjectionUniform::new(ctx, matrix));
        Ok(())
    }

    fn release_projection(&mut self) {
        self.projection = None;
    }

    fn load_font(&mut self, font: &[u8]) -> Result<(), BackendError> {
        self.atlas.set_font(font)
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        let ctx = self.ctx.as_mut().ok_or(BackendError::NotReady("device"))?;
        ctx.resize(width, height);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn recreate_swapchain(
        &mut self,
        _samples: SampleDesc,
        sync_interval: u32,
    ) -> Result<(), BackendError> {
        let ctx = self.ctx.as_mut().ok_or(BackendError::NotReady("device"))?;
        ctx.set_sync_interval(sync_interval);
        self.sync_interval = sync_interval;
        Ok(())
    }

    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError> {
        self.frame = None;
        self.reset_frame_data();
        self.clear = clear;

        let ctx = self.ctx.as_mut().ok_or(BackendError::NotReady("device"))?;
        match ctx.surface.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(AcquiredFrame {
                    surface_texture,
                    view,
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                match ctx.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Err(BackendError::Surface(message))
                    }
                    SurfaceErrorAction::Fatal => Err(BackendError::Fatal(message)),
                }
            }
        }
    }

    fn bind_geometry_state(&mut self) {}

    fn begin_sprites(&mut self) {
        self.in_sprite_batch = true;
    }

    fn end_sprites(&mut self) {
        self.in_sprite_batch = false;
    }

    fn restore_blend_state(&mut self) {}

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError> {
        let frame = self
            .frame
            .take()
            .ok_or(BackendError::NotReady("no frame in flight"))?;
        let result = self.encode_and_present(frame);
        self.reset_frame_data();

        if sync_interval != self.sync_interval {
            if let Some(ctx) = self.ctx.as_mut() {
                ctx.set_sync_interval(sync_interval);
                self.sync_interval = sync_interval;
            }
        }
        result
    }
}
