use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;
use crate::error::BackendError;
use crate::paint::Color;

use super::context::GpuContext;
use super::pipelines::SpriteInstance;

/// Pixel size of text drawn at scale 1.
pub(super) const BASE_FONT_PX: f32 = 16.0;

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Font plus a 2048 × 2048 R8Unorm glyph atlas.
///
/// Glyphs are rasterized on first use and shelf-packed into the atlas. The
/// cache key is `GlyphRasterConfig` (font hash, glyph index, pixel size), so a
/// glyph is rasterized once per size. When the atlas fills up, further new
/// glyphs are skipped with a warning.
pub(super) struct GlyphAtlas {
    font: Option<fontdue::Font>,

    texture: Option<wgpu::Texture>,
    bind_group: Option<wgpu::BindGroup>,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,

    cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    layout: Layout<()>,
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self {
            font: None,
            texture: None,
            bind_group: None,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
            cache: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl GlyphAtlas {
    /// Parses `bytes` and makes it the active font. The atlas is repacked from scratch.
    pub fn set_font(&mut self, bytes: &[u8]) -> Result<(), BackendError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| BackendError::Font(e.to_string()))?;
        self.font = Some(font);
        self.reset_packing();
        Ok(())
    }

    fn reset_packing(&mut self) {
        self.cache.clear();
        self.cursor_x = GLYPH_PADDING;
        self.cursor_y = GLYPH_PADDING;
        self.row_height = 0;
        self.full = false;
    }

    pub fn ensure_texture(&mut self, ctx: &GpuContext) {
        if self.texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("halo glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("halo glyph atlas bind group"),
            layout: &ctx.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&ctx.sampler),
                },
            ],
        }));
        self.texture = Some(texture);
        self.reset_packing();
    }

    /// Drops GPU resources; the font is kept.
    pub fn release(&mut self) {
        self.texture = None;
        self.bind_group = None;
        self.reset_packing();
    }

    #[inline]
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Lays out `text` with its top-left at `pos` and appends one instance per
    /// inked glyph. Returns the number of instances appended.
    pub fn layout_text(
        &mut self,
        ctx: &GpuContext,
        text: &str,
        pos: Vec2,
        color: Color,
        scale: f32,
        out: &mut Vec<SpriteInstance>,
    ) -> usize {
        self.ensure_texture(ctx);
        let Some(font) = self.font.as_ref() else {
            return 0;
        };

        let px = BASE_FONT_PX * scale.max(0.01);
        self.layout.reset(&LayoutSettings {
            x: pos.x,
            y: pos.y,
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, px, 0));

        // Snapshot glyph positions so the borrow on `self.layout` ends before
        // `place_glyph` needs `&mut self`.
        let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let color = color.to_array();
        let start = out.len();
        for (key, x, y, w, h) in glyphs {
            if !self.cache.contains_key(&key) {
                let Some(font) = self.font.as_ref() else {
                    break;
                };
                let (metrics, bitmap) = font.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                if let Some(entry) =
                    self.place_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                {
                    self.cache.insert(key, entry);
                }
            }

            let Some(cached) = self.cache.get(&key) else {
                continue;
            };
            out.push(SpriteInstance {
                dst_min: [x, y],
                dst_max: [x + w as f32, y + h as f32],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
                mask: 1.0,
            });
        }
        out.len() - start
    }

    fn place_glyph(
        &mut self,
        ctx: &GpuContext,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<CachedGlyph> {
        if self.full {
            return None;
        }

        // New shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!(
                "gpu: glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); some glyphs will not be drawn"
            );
            self.full = true;
            return None;
        }

        let gx = self.cursor_x;
        let gy = self.cursor_y;
        let atlas = self.texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);

        let size = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        })
    }

    /// Extent of `text` at scale 1.
    ///
    /// The full extent runs from the origin to the last pen position and line
    /// bottom; with `ignore_whitespace` it is the tight box around inked glyphs.
    pub fn measure(&self, text: &str, ignore_whitespace: bool) -> Vec2 {
        let Some(font) = self.font.as_ref() else {
            return Vec2::zero();
        };

        let px = BASE_FONT_PX;
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::zero();
        }

        if ignore_whitespace {
            let inked = glyphs
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0);
            let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
            let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
            for g in inked {
                min_x = min_x.min(g.x);
                min_y = min_y.min(g.y);
                max_x = max_x.max(g.x + g.width as f32);
                max_y = max_y.max(g.y + g.height as f32);
            }
            if min_x > max_x {
                return Vec2::zero();
            }
            return Vec2::new(max_x - min_x, max_y - min_y);
        }

        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        Vec2::new(w, layout.height())
    }
}
