use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::{RenderList, Topology, Vertex};

impl RenderList {
    /// Solid triangle. Vertices are emitted in argument order; pass them
    /// clockwise on screen (top, bottom-right, bottom-left) or the pipeline culls it.
    pub fn draw_filled_triangle(
        &mut self,
        top: Vec2,
        bottom_right: Vec2,
        bottom_left: Vec2,
        color: Color,
    ) {
        self.push_vertices(
            &[
                Vertex::new(top, color),
                Vertex::new(bottom_right, color),
                Vertex::new(bottom_left, color),
            ],
            Topology::TriangleList,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::test_util::{list, screen_cw};

    #[test]
    fn upright_triangle_is_clockwise() {
        let mut l = list();
        l.draw_filled_triangle(
            Vec2::new(50.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
            Color::GREEN,
        );
        assert_eq!(l.vertices().len(), 3);
        assert!(screen_cw(&l, 0) > 0.0);
    }
}
