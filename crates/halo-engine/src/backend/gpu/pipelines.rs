use bytemuck::{Pod, Zeroable};

use crate::render::{Topology, Vertex};

use super::context::GpuContext;

/// Straight-alpha colour blending; destination alpha accumulates coverage.
pub(super) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── sprite geometry ───────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadCorner {
    pub corner: [f32; 2],
}

impl QuadCorner {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadCorner>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_CORNERS: [QuadCorner; 4] = [
    QuadCorner { corner: [0.0, 0.0] },
    QuadCorner { corner: [1.0, 0.0] },
    QuadCorner { corner: [1.0, 1.0] },
    QuadCorner { corner: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Instance data layout (52 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
///  offset 48  mask     f32        loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct SpriteInstance {
    pub dst_min: [f32; 2],
    pub dst_max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
    pub mask: f32,
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4, // color
        6 => Float32    // mask
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── pipelines ─────────────────────────────────────────────────────────────

/// One geometry pipeline per topology plus the sprite pipeline, all built for
/// the same sample count.
pub(super) struct Pipelines {
    pub sample_count: u32,
    line_list: wgpu::RenderPipeline,
    line_strip: wgpu::RenderPipeline,
    triangle_list: wgpu::RenderPipeline,
    pub sprite: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(ctx: &GpuContext, sample_count: u32) -> Self {
        let device = &ctx.device;
        let format = ctx.config.format;
        let multisample = wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        };

        let geometry_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halo geometry shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/geometry.wgsl").into()),
        });
        let geometry_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halo geometry pipeline layout"),
            bind_group_layouts: &[&ctx.projection_layout],
            immediate_size: 0,
        });

        let geometry = |topology: Topology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("halo geometry pipeline"),
                layout: Some(&geometry_layout),
                vertex: wgpu::VertexState {
                    module: &geometry_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &geometry_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(straight_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: topology.to_wgpu(),
                    strip_index_format: None,
                    // Shapes are emitted clockwise in Y-down pixel space, which
                    // the projection keeps clockwise in clip space.
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample,
                multiview_mask: None,
                cache: None,
            })
        };

        let line_list = geometry(Topology::LineList);
        let line_strip = geometry(Topology::LineStrip);
        let triangle_list = geometry(Topology::TriangleList);

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halo sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });
        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halo sprite pipeline layout"),
            bind_group_layouts: &[&ctx.projection_layout, &ctx.texture_layout],
            immediate_size: 0,
        });
        let sprite = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("halo sprite pipeline"),
            layout: Some(&sprite_layout),
            vertex: wgpu::VertexState {
                module: &sprite_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadCorner::layout(), SpriteInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &sprite_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample,
            multiview_mask: None,
            cache: None,
        });

        Self {
            sample_count,
            line_list,
            line_strip,
            triangle_list,
            sprite,
        }
    }

    pub fn geometry(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::LineList => &self.line_list,
            Topology::LineStrip => &self.line_strip,
            Topology::TriangleList => &self.triangle_list,
        }
    }
}

/// Multisampled colour target resolved into the swapchain image.
pub(super) fn create_msaa_view(ctx: &GpuContext, sample_count: u32) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let (width, height) = ctx.size();
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("halo msaa target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
