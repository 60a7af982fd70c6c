use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::{RenderList, Topology, Vertex};

/// Segment count of [`RenderList::draw_circle`].
pub const CIRCLE_SEGMENTS: usize = 24;

#[inline]
fn rim(center: Vec2, radius: f32, segments: usize, i: usize) -> Vec2 {
    let angle = TAU * (i % segments) as f32 / segments as f32;
    center + Vec2::new(radius, 0.0).rotated(angle)
}

impl RenderList {
    /// Circle outline with [`CIRCLE_SEGMENTS`] segments.
    #[inline]
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw_smooth_circle::<CIRCLE_SEGMENTS>(center, radius, color);
    }

    /// Circle outline with `N` segments (`N + 1` vertices, closed line strip).
    #[inline]
    pub fn draw_smooth_circle<const N: usize>(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw_circle_segments(center, radius, N, color);
    }

    /// Runtime-segment variant of [`draw_smooth_circle`](Self::draw_smooth_circle).
    pub fn draw_circle_segments(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: usize,
        color: Color,
    ) {
        let Some(count) = self.segment_vertices(segments, 1, 1) else {
            return;
        };
        self.push_with(Topology::LineStrip, count, |out| {
            // Start and end at angle 0 so the strip closes exactly.
            out.extend((0..=segments).map(|i| Vertex::new(rim(center, radius, segments, i), color)));
        });
    }

    /// Filled disc as a fan of `N` triangles (`3N` vertices).
    #[inline]
    pub fn draw_smooth_filled_circle<const N: usize>(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Color,
    ) {
        self.draw_filled_circle_segments(center, radius, N, color);
    }

    /// Runtime-segment variant of [`draw_smooth_filled_circle`](Self::draw_smooth_filled_circle).
    pub fn draw_filled_circle_segments(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: usize,
        color: Color,
    ) {
        let Some(count) = self.segment_vertices(segments, 3, 0) else {
            return;
        };
        self.push_with(Topology::TriangleList, count, |out| {
            for i in 0..segments {
                out.push(Vertex::new(center, color));
                out.push(Vertex::new(rim(center, radius, segments, i), color));
                out.push(Vertex::new(rim(center, radius, segments, i + 1), color));
            }
        });
    }

    /// `segments * per + extra`, or `None` when there is nothing to draw or the
    /// result cannot fit in this list.
    fn segment_vertices(&self, segments: usize, per: usize, extra: usize) -> Option<usize> {
        if segments == 0 {
            return None;
        }
        segments
            .checked_mul(per)
            .and_then(|n| n.checked_add(extra))
            .filter(|&n| n <= self.capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::test_util::{list, screen_cw};
    use crate::render::Batch;

    #[test]
    fn outline_closes() {
        let mut l = list();
        l.draw_circle(Vec2::new(100.0, 100.0), 10.0, Color::WHITE);

        assert_eq!(l.batches(), &[Batch::new(25, Topology::LineStrip)]);
        let v = l.vertices();
        assert_eq!(v[0].pos, v[24].pos);
        assert_eq!(v[0].pos, [110.0, 100.0, 0.0]);
    }

    #[test]
    fn rim_points_lie_on_radius() {
        let mut l = list();
        l.draw_smooth_circle::<64>(Vec2::new(50.0, 60.0), 20.0, Color::WHITE);
        assert_eq!(l.vertices().len(), 65);
        for v in l.vertices() {
            let d = (v.position() - Vec2::new(50.0, 60.0)).length();
            assert!((d - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn filled_fan_is_clockwise() {
        let mut l = list();
        l.draw_smooth_filled_circle::<32>(Vec2::new(200.0, 200.0), 15.0, Color::BLUE);
        assert_eq!(l.batches(), &[Batch::new(96, Topology::TriangleList)]);
        for tri in 0..32 {
            assert!(screen_cw(&l, tri * 3) > 0.0);
        }
    }

    #[test]
    fn huge_segment_counts_emit_nothing() {
        let mut l = list();
        l.draw_circle_segments(Vec2::zero(), 5.0, usize::MAX, Color::WHITE);
        l.draw_filled_circle_segments(Vec2::zero(), 5.0, usize::MAX / 2, Color::WHITE);
        l.draw_filled_circle_segments(Vec2::zero(), 5.0, l.capacity(), Color::WHITE);
        assert!(l.is_empty());
        assert!(l.batches().is_empty());

        // Existing geometry survives a rejected call.
        l.draw_circle(Vec2::new(10.0, 10.0), 5.0, Color::WHITE);
        l.draw_circle_segments(Vec2::zero(), 5.0, usize::MAX, Color::WHITE);
        assert_eq!(l.vertices().len(), CIRCLE_SEGMENTS + 1);
    }

    #[test]
    fn zero_segments_emit_nothing() {
        let mut l = list();
        l.draw_smooth_circle::<0>(Vec2::zero(), 5.0, Color::WHITE);
        l.draw_smooth_filled_circle::<0>(Vec2::zero(), 5.0, Color::WHITE);
        assert!(l.is_empty());
    }
}
