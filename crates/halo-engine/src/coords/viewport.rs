use super::Vec2;

/// Size of the output surface in pixels.
///
/// Always at least 1×1 once a surface exists; the projection and the arrow
/// helper derive from it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from integer surface dimensions, clamping each to at least 1.
    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width.max(1) as f32, height.max(1) as f32)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
