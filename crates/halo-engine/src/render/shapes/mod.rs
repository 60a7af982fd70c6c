//! Shape emitters. Each `draw_*` call appends one batch to a
//! [`RenderList`](super::RenderList), except `draw_outlined_rect`, which appends four.

pub(crate) mod arrow;
pub(crate) mod circle;
pub(crate) mod line;
pub(crate) mod rect;
pub(crate) mod triangle;

pub use arrow::{ARROW_HEAD_ANGLE, ARROW_HEAD_RATIO};
pub use circle::CIRCLE_SEGMENTS;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::Vertex;

/// Appends two clockwise triangles covering `rect`: (TL, TR, BL) then (TR, BR, BL).
#[inline]
pub(crate) fn quad(out: &mut Vec<Vertex>, rect: Rect, color: Color) {
    quad_corners(
        out,
        [rect.top_left(), rect.top_right(), rect.bottom_left(), rect.bottom_right()],
        [color; 4],
    );
}

/// Same as [`quad`] with explicit corners `[TL, TR, BL, BR]` and per-corner colours.
#[inline]
pub(crate) fn quad_corners(out: &mut Vec<Vertex>, p: [Vec2; 4], c: [Color; 4]) {
    let [tl, tr, bl, br] = p;
    let [ctl, ctr, cbl, cbr] = c;
    out.extend_from_slice(&[
        Vertex::new(tl, ctl),
        Vertex::new(tr, ctr),
        Vertex::new(bl, cbl),
        Vertex::new(tr, ctr),
        Vertex::new(br, cbr),
        Vertex::new(bl, cbl),
    ]);
}

/// The four edge strips of a stroke `width` wide lying inside `rect`.
pub(crate) fn inner_strips(rect: Rect, width: f32) -> [Rect; 4] {
    [
        // left, right, top, bottom
        Rect::new(rect.x, rect.y, width, rect.h),
        Rect::new(rect.right() - width, rect.y, width, rect.h),
        Rect::new(rect.x, rect.y, rect.w, width),
        Rect::new(rect.x, rect.bottom() - width, rect.w, width),
    ]
}

/// Appends the rect outline as four line segments (8 vertices).
pub(crate) fn line_loop(out: &mut Vec<Vertex>, rect: Rect, color: Color) {
    let corners = [rect.top_left(), rect.top_right(), rect.bottom_right(), rect.bottom_left()];
    for i in 0..4 {
        out.push(Vertex::new(corners[i], color));
        out.push(Vertex::new(corners[(i + 1) % 4], color));
    }
}
