use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::{RenderList, Topology, Vertex};

/// Wing length as a fraction of the arrow radius.
pub const ARROW_HEAD_RATIO: f32 = 0.25;
/// Half-angle between the wings, radians.
pub const ARROW_HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

impl RenderList {
    /// Arrowhead on a ring of `radius` around the surface centre, pointing at `target`.
    ///
    /// Emits two wing lines meeting at the tip. A target at the exact centre has
    /// no direction and emits nothing.
    pub fn draw_arrow(&mut self, target: Vec2, radius: f32, color: Color) {
        let center = self.viewport().center();
        let Some(dir) = (target - center).normalized() else {
            return;
        };

        let tip = center + dir * radius;
        let back = -dir * (radius * ARROW_HEAD_RATIO);
        let left = tip + back.rotated(-ARROW_HEAD_ANGLE);
        let right = tip + back.rotated(ARROW_HEAD_ANGLE);

        self.push_vertices(
            &[
                Vertex::new(tip, color),
                Vertex::new(left, color),
                Vertex::new(tip, color),
                Vertex::new(right, color),
            ],
            Topology::LineList,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::test_util::list;
    use crate::render::Batch;

    #[test]
    fn tip_points_at_target() {
        let mut l = list(); // 800×600, centre (400, 300)
        l.draw_arrow(Vec2::new(800.0, 300.0), 100.0, Color::RED);

        assert_eq!(l.batches(), &[Batch::new(4, Topology::LineList)]);
        let tip = l.vertices()[0].position();
        assert!((tip.x - 500.0).abs() < 1e-4);
        assert!((tip.y - 300.0).abs() < 1e-4);

        // Wings trail behind the tip, one on each side.
        let left = l.vertices()[1].position();
        let right = l.vertices()[3].position();
        assert!(left.x < tip.x && right.x < tip.x);
        assert!((left.y - 300.0) * (right.y - 300.0) < 0.0);
    }

    #[test]
    fn centred_target_emits_nothing() {
        let mut l = list();
        l.draw_arrow(Vec2::new(400.0, 300.0), 50.0, Color::RED);
        assert!(l.is_empty());
    }
}
