use std::collections::HashMap;

use crate::backend::TextureHandle;
use crate::error::BackendError;
use crate::texture::TextureOrigin;

use super::context::GpuContext;

pub(super) struct GpuTexture {
    _texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub size: (u32, u32),
}

/// Decoded, uploaded sprite textures keyed by backend handle.
#[derive(Default)]
pub(super) struct TextureStore {
    entries: HashMap<TextureHandle, GpuTexture>,
    next: u32,
}

impl TextureStore {
    /// Decodes `origin` (any format the `image` crate was built with) and uploads it as RGBA8.
    pub fn load(
        &mut self,
        ctx: &GpuContext,
        origin: &TextureOrigin,
    ) -> Result<TextureHandle, BackendError> {
        let bytes = origin
            .read()
            .map_err(|e| BackendError::Texture(format!("{origin}: {e}")))?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| BackendError::Texture(format!("{origin}: {e}")))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(BackendError::Texture(format!("{origin}: empty image")));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("halo sprite texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("halo sprite bind group"),
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
        });

        let handle = TextureHandle(self.next);
        self.next = self.next.wrapping_add(1);
        self.entries.insert(
            handle,
            GpuTexture {
                _texture: texture,
                bind_group,
                size: (width, height),
            },
        );
        Ok(handle)
    }

    #[inline]
    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.entries.get(&handle)
    }

    pub fn release(&mut self, handle: TextureHandle) {
        self.entries.remove(&handle);
    }
}
