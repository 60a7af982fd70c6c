use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::render::{RenderList, Topology, Vertex};

use super::quad_corners;

impl RenderList {
    /// One-pixel line segment.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.push_vertices(
            &[Vertex::new(from, color), Vertex::new(to, color)],
            Topology::LineList,
        );
    }

    /// Line segment `thickness` pixels wide, emitted as a quad.
    ///
    /// A zero-length segment has no direction and emits nothing.
    pub fn draw_thick_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let Some(dir) = (to - from).normalized() else {
            return;
        };
        let n = dir.perp() * (thickness * 0.5);

        // Ordered like TL/TR/BL/BR for a left-to-right segment; rotation keeps it clockwise.
        let corners = [from - n, to - n, from + n, to + n];
        self.push_with(Topology::TriangleList, 6, |out| {
            quad_corners(out, corners, [color; 4])
        });
    }

    /// 2×2 filled square at `pos`.
    pub fn draw_dot(&mut self, pos: Vec2, color: Color) {
        self.draw_filled_rect(Rect::new(pos.x, pos.y, 2.0, 2.0), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::test_util::{list, screen_cw};
    use crate::render::Batch;

    #[test]
    fn line_is_two_vertices() {
        let mut l = list();
        l.draw_line(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Color::RED);
        assert_eq!(l.batches(), &[Batch::new(2, Topology::LineList)]);
        assert_eq!(l.vertices()[1].pos, [3.0, 4.0, 0.0]);
    }

    #[test]
    fn thick_line_is_clockwise_in_any_direction() {
        for to in [Vec2::new(50.0, 0.0), Vec2::new(-50.0, 10.0), Vec2::new(0.0, -40.0)] {
            let mut l = list();
            l.draw_thick_line(Vec2::zero(), to, 4.0, Color::WHITE);
            assert_eq!(l.batches(), &[Batch::new(6, Topology::TriangleList)]);
            assert!(screen_cw(&l, 0) > 0.0);
            assert!(screen_cw(&l, 3) > 0.0);
        }
    }

    #[test]
    fn degenerate_thick_line_emits_nothing() {
        let mut l = list();
        l.draw_thick_line(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 3.0, Color::WHITE);
        assert!(l.is_empty());
    }

    #[test]
    fn dot_is_two_by_two() {
        let mut l = list();
        l.draw_dot(Vec2::new(10.0, 10.0), Color::GREEN);
        assert_eq!(l.vertices().len(), 6);
        assert_eq!(l.vertices()[4].pos, [12.0, 12.0, 0.0]);
    }
}
