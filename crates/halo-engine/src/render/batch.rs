/// Primitive topology of a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    LineList,
    LineStrip,
    TriangleList,
}

impl Topology {
    /// Largest vertex count `<= count` that still forms whole primitives.
    #[inline]
    pub fn whole_primitives(self, count: u32) -> u32 {
        match self {
            Topology::LineList => count - count % 2,
            Topology::TriangleList => count - count % 3,
            Topology::LineStrip => {
                if count >= 2 {
                    count
                } else {
                    0
                }
            }
        }
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
            Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// A contiguous run of vertices drawn with one topology in one draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Batch {
    pub count: u32,
    pub topology: Topology,
}

impl Batch {
    #[inline]
    pub const fn new(count: u32, topology: Topology) -> Self {
        Self { count, topology }
    }
}
