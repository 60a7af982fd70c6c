use crate::backend::TextMeasure;
use crate::coords::Vec2;
use crate::paint::Color;

use super::RenderList;

/// Offsets of the four shadow copies behind an outlined string.
const OUTLINE_OFFSETS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
];

impl RenderList {
    /// Queues `text` at `pos` (top-left of the first line).
    pub fn draw_string(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        self.push_text(text, pos, color, scale);
    }

    /// Queues four black copies offset diagonally by one pixel, then `text` itself.
    pub fn draw_outlined_string(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        for off in OUTLINE_OFFSETS {
            self.push_text(text, pos + off, Color::BLACK, scale);
        }
        self.push_text(text, pos, color, scale);
    }

    /// Pixel extent of `text` as the backend would lay it out.
    ///
    /// With `ignore_whitespace` the measured box is tight around the inked glyphs.
    pub fn measure_string(
        &self,
        measure: &dyn TextMeasure,
        text: &str,
        ignore_whitespace: bool,
    ) -> Vec2 {
        measure.measure_text(text, ignore_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{Call, RecordingBackend};
    use crate::coords::Viewport;

    fn list() -> RenderList {
        RenderList::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn outlined_string_queues_shadows_first() {
        let mut l = list();
        l.draw_outlined_string("HP 100", Vec2::new(10.0, 10.0), Color::GREEN, 1.0);

        let queued: Vec<_> = l.texts().collect();
        assert_eq!(queued.len(), 5);
        for (i, off) in OUTLINE_OFFSETS.iter().enumerate() {
            assert_eq!(queued[i].1, Vec2::new(10.0, 10.0) + *off);
            assert_eq!(queued[i].2, Color::BLACK);
        }
        assert_eq!(queued[4].1, Vec2::new(10.0, 10.0));
        assert_eq!(queued[4].2, Color::GREEN);
    }

    #[test]
    fn translucent_text_keeps_solid_shadows() {
        let mut l = list();
        let ghost = Color::WHITE.with_alpha(0.5);
        l.draw_outlined_string("x", Vec2::new(4.0, 4.0), ghost, 1.0);

        let colors: Vec<Color> = l.texts().map(|t| t.2).collect();
        assert_eq!(colors, vec![Color::BLACK, Color::BLACK, Color::BLACK, Color::BLACK, ghost]);
    }

    #[test]
    fn text_is_drawn_in_insertion_order() {
        let mut l = list();
        l.draw_string("a", Vec2::new(1.0, 1.0), Color::WHITE, 1.0);
        l.draw_string("b", Vec2::new(2.0, 2.0), Color::RED, 2.0);

        let mut backend = RecordingBackend::default();
        l.draw_2d_text(&mut backend);
        assert_eq!(
            backend.calls,
            vec![
                Call::Text("a".into(), Vec2::new(1.0, 1.0), Color::WHITE, 1.0),
                Call::Text("b".into(), Vec2::new(2.0, 2.0), Color::RED, 2.0),
            ]
        );
    }

    #[test]
    fn measure_goes_through_backend() {
        let l = list();
        let backend = RecordingBackend::default();
        // The recording backend reports 8×16 per character.
        assert_eq!(l.measure_string(&backend, "abc", false), Vec2::new(24.0, 16.0));
    }
}
