use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::context::GpuContext;

/// GPU buffer that is re-created with a larger size when an upload does not fit.
pub(super) struct DynamicBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl DynamicBuffer {
    pub fn new(label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            buffer: None,
            capacity: 0,
        }
    }

    /// Allocates room for `bytes` up front.
    pub fn reserve(&mut self, device: &wgpu::Device, bytes: u64) {
        if bytes <= self.capacity && self.buffer.is_some() {
            return;
        }
        let size = bytes.next_power_of_two().max(256);
        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size,
            usage: self.usage,
            mapped_at_creation: false,
        }));
        self.capacity = size;
    }

    /// Uploads `data` at offset 0, growing the buffer first if needed.
    pub fn write<T: Pod>(&mut self, ctx: &GpuContext, data: &[T]) {
        if data.is_empty() {
            return;
        }
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if bytes.len() as u64 > self.capacity {
            log::debug!(
                "gpu: growing {} from {} to {} bytes",
                self.label,
                self.capacity,
                bytes.len()
            );
        }
        self.reserve(&ctx.device, bytes.len() as u64);
        if let Some(buffer) = &self.buffer {
            ctx.queue.write_buffer(buffer, 0, bytes);
        }
    }

    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    pub fn release(&mut self) {
        self.buffer = None;
        self.capacity = 0;
    }
}

/// Projection matrix uniform and its bind group.
pub(super) struct ProjectionUniform {
    _buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ProjectionUniform {
    pub fn new(ctx: &GpuContext, matrix: [[f32; 4]; 4]) -> Self {
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("halo projection ubo"),
                contents: bytemuck::bytes_of(&matrix),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("halo projection bind group"),
            layout: &ctx.projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            _buffer: buffer,
            bind_group,
        }
    }
}
