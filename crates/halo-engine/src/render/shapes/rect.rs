use crate::coords::Rect;
use crate::paint::Color;
use crate::render::{RenderList, Topology};

use super::{inner_strips, line_loop, quad, quad_corners};

impl RenderList {
    /// Solid rectangle (6 vertices).
    pub fn draw_filled_rect(&mut self, rect: Rect, color: Color) {
        self.push_with(Topology::TriangleList, 6, |out| quad(out, rect, color));
    }

    /// Stroke of width `stroke` lying inside `rect` (four strips, 24 vertices).
    pub fn draw_rect(&mut self, rect: Rect, stroke: f32, color: Color) {
        self.push_with(Topology::TriangleList, 24, |out| {
            for strip in inner_strips(rect, stroke) {
                quad(out, strip, color);
            }
        });
    }

    /// Inner stroke drawn as four separate filled strips (one batch each).
    pub fn draw_outlined_rect(&mut self, rect: Rect, stroke: f32, color: Color) {
        for strip in inner_strips(rect, stroke) {
            self.draw_filled_rect(strip, color);
        }
    }

    /// Filled rectangle with an inner stroke in `outline` (one batch, 30 vertices).
    pub fn draw_outlined_filled_rect(
        &mut self,
        rect: Rect,
        stroke: f32,
        fill: Color,
        outline: Color,
    ) {
        self.push_with(Topology::TriangleList, 30, |out| {
            quad(out, rect, fill);
            for strip in inner_strips(rect, stroke) {
                quad(out, strip, outline);
            }
        });
    }

    /// One-pixel `inside` outline framed by one-pixel `outline` lines on both
    /// sides (three concentric line loops, 24 vertices).
    pub fn draw_rect_two_tone(&mut self, rect: Rect, inside: Color, outline: Color) {
        self.push_with(Topology::LineList, 24, |out| {
            line_loop(out, rect.inflated(1.0), outline);
            line_loop(out, rect, inside);
            line_loop(out, rect.inflated(-1.0), outline);
        });
    }

    /// Inner stroke of width `stroke` in `inside`, wrapped by a one-pixel band of
    /// `outline` on both sides (48 vertices).
    pub fn draw_rect_stroked_two_tone(
        &mut self,
        rect: Rect,
        stroke: f32,
        inside: Color,
        outline: Color,
    ) {
        self.push_with(Topology::TriangleList, 48, |out| {
            for strip in inner_strips(rect.inflated(1.0), stroke + 2.0) {
                quad(out, strip, outline);
            }
            for strip in inner_strips(rect, stroke) {
                quad(out, strip, inside);
            }
        });
    }

    /// Rectangle shaded from `color` at the top-left toward darker corners.
    ///
    /// `intensity` in `[0, 1]` controls how strongly the far corners darken:
    /// top-right `rgb × (0.8 + 0.2s)`, bottom-left `rgb × (0.6 + 0.4s)`,
    /// bottom-right `rgb × (0.4 + 0.6s)` with `s = 1 - intensity`. Alpha is kept.
    pub fn draw_filled_rect_gradient(&mut self, rect: Rect, color: Color, intensity: f32) {
        let s = 1.0 - intensity.clamp(0.0, 1.0);
        let corners = [
            color,
            color.scale_rgb(0.8 + 0.2 * s),
            color.scale_rgb(0.6 + 0.4 * s),
            color.scale_rgb(0.4 + 0.6 * s),
        ];
        let points = [rect.top_left(), rect.top_right(), rect.bottom_left(), rect.bottom_right()];

        self.push_with(Topology::TriangleList, 6, |out| {
            quad_corners(out, points, corners)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::test_util::{list, screen_cw};
    use crate::render::Batch;

    #[test]
    fn filled_rect_winding() {
        let mut l = list();
        l.draw_filled_rect(Rect::new(10.0, 10.0, 100.0, 50.0), Color::WHITE);

        let p: Vec<[f32; 3]> = l.vertices().iter().map(|v| v.pos).collect();
        assert_eq!(
            p,
            vec![
                [10.0, 10.0, 0.0],
                [110.0, 10.0, 0.0],
                [10.0, 60.0, 0.0],
                [110.0, 10.0, 0.0],
                [110.0, 60.0, 0.0],
                [10.0, 60.0, 0.0],
            ]
        );
        assert!(screen_cw(&l, 0) > 0.0);
        assert!(screen_cw(&l, 3) > 0.0);
    }

    #[test]
    fn composite_rects_are_single_batches() {
        let r = Rect::new(0.0, 0.0, 40.0, 20.0);
        let mut l = list();
        l.draw_rect(r, 2.0, Color::RED);
        l.draw_outlined_rect(r, 2.0, Color::RED);
        l.draw_outlined_filled_rect(r, 1.0, Color::BLACK, Color::WHITE);
        l.draw_rect_two_tone(r, Color::WHITE, Color::BLACK);
        l.draw_rect_stroked_two_tone(r, 2.0, Color::WHITE, Color::BLACK);

        assert_eq!(
            l.batches(),
            &[
                Batch::new(24, Topology::TriangleList),
                Batch::new(24, Topology::TriangleList),
                Batch::new(30, Topology::TriangleList),
                Batch::new(24, Topology::LineList),
                Batch::new(48, Topology::TriangleList),
            ]
        );
        assert_eq!(l.batch_total(), l.vertices().len());
    }

    #[test]
    fn stroke_stays_inside_bounds() {
        let r = Rect::new(5.0, 5.0, 30.0, 30.0);
        let mut l = list();
        l.draw_rect(r, 3.0, Color::RED);
        for v in l.vertices() {
            assert!(v.pos[0] >= 5.0 && v.pos[0] <= 35.0);
            assert!(v.pos[1] >= 5.0 && v.pos[1] <= 35.0);
        }
    }

    #[test]
    fn outlined_rect_stays_inside_bounds() {
        let r = Rect::new(5.0, 5.0, 30.0, 30.0);
        let mut l = list();
        l.draw_outlined_rect(r, 2.0, Color::RED);

        assert_eq!(l.batches().len(), 4);
        assert_eq!(l.vertices().len(), 24);
        for v in l.vertices() {
            assert!((5.0..=35.0).contains(&v.pos[0]), "x = {}", v.pos[0]);
            assert!((5.0..=35.0).contains(&v.pos[1]), "y = {}", v.pos[1]);
        }
        let top_of_bottom_strip = l.vertices()[18..]
            .iter()
            .map(|v| v.pos[1])
            .fold(f32::MAX, f32::min);
        assert_eq!(top_of_bottom_strip, 33.0);
    }

    #[test]
    fn gradient_corner_colours() {
        let mut l = list();
        let base = Color::new(1.0, 0.5, 0.25, 0.75);
        l.draw_filled_rect_gradient(Rect::new(0.0, 0.0, 10.0, 10.0), base, 1.0);

        let v = l.vertices();
        assert_eq!(v[0].color, base.to_array());
        assert_eq!(v[1].color, base.scale_rgb(0.8).to_array());
        assert_eq!(v[2].color, base.scale_rgb(0.6).to_array());
        assert_eq!(v[4].color, base.scale_rgb(0.4).to_array());
        assert_eq!(v[4].color[3], 0.75);
    }

    #[test]
    fn zero_intensity_gradient_is_flat() {
        let mut l = list();
        l.draw_filled_rect_gradient(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, 0.0);
        for v in l.vertices() {
            assert!((v.color[0] - 1.0).abs() < 1e-6);
            assert_eq!(v.color[1], 0.0);
        }
    }
}
