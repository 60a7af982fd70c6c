use crate::backend::Backend;
use crate::error::BackendError;

use super::{Renderer, RendererState};

impl<B: Backend> Renderer<B> {
    /// Clears the target and binds the shared geometry state.
    ///
    /// Skipped while a resize is in progress or when the renderer is not ready.
    pub fn begin(&mut self) {
        if self.resizing {
            log::debug!("renderer: begin skipped during resize");
            return;
        }
        if self.state != RendererState::Ready || self.frame_active {
            return;
        }

        if let Err(e) = self.backend.begin_frame(self.clear_color) {
            self.on_frame_error("begin", e);
            return;
        }
        self.backend.bind_geometry_state();
        self.frame_active = true;
    }

    /// Submits both layers, the texture queue and text, presents, then clears
    /// every per-frame accumulator.
    ///
    /// Starts the frame itself when `begin` was not called. When no frame can be
    /// started (resize in progress, renderer not ready, surface unavailable) the
    /// accumulated work is discarded.
    pub fn end(&mut self) {
        if !self.frame_active {
            self.begin();
        }
        if !self.frame_active {
            self.clear_frame();
            return;
        }

        self.background.draw(&mut self.backend);
        self.background.draw_2d_text(&mut self.backend);

        self.backend.bind_geometry_state();
        self.foreground.draw(&mut self.backend);

        self.backend.begin_sprites();
        self.textures.submit(&mut self.backend);
        self.backend.end_sprites();

        self.foreground.draw_2d_text(&mut self.backend);
        self.backend.restore_blend_state();

        if let Err(e) = self.backend.present(self.vsync) {
            self.on_frame_error("present", e);
        }

        self.frame_active = false;
        self.clear_frame();
    }

    fn clear_frame(&mut self) {
        self.background.clear();
        self.foreground.clear();
        self.textures.clear();
    }

    fn on_frame_error(&mut self, what: &str, e: BackendError) {
        match e {
            BackendError::Fatal(_) => {
                log::error!("renderer: {what} failed: {e}");
                self.state = RendererState::Lost;
            }
            _ => log::debug!("renderer: {what} skipped: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::testing::Call;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;
    use crate::render::Topology;
    use crate::renderer::test_util::ready;
    use crate::renderer::RendererState;

    #[test]
    fn filled_rect_frame() {
        let mut r = ready(800, 600);
        r.begin();
        r.foreground()
            .draw_filled_rect(Rect::new(10.0, 10.0, 100.0, 50.0), Color::RED);
        r.end();

        let b = r.backend();
        assert_eq!(
            b.count(|c| matches!(c, Call::Draw(..))),
            1
        );
        assert!(b.calls.contains(&Call::Draw(Topology::TriangleList, 6, 0)));
        assert!(r.foreground().is_empty());
        assert!(r.background().is_empty());
    }

    #[test]
    fn end_follows_layer_order() {
        let mut r = ready(800, 600);
        let tex = r.add_texture("hud.png");
        r.backend_mut().calls.clear();

        r.begin();
        r.background().draw_line(Vec2::zero(), Vec2::new(5.0, 5.0), Color::WHITE);
        r.background().draw_string("bg", Vec2::zero(), Color::WHITE, 1.0);
        r.foreground().draw_dot(Vec2::new(1.0, 1.0), Color::WHITE);
        r.foreground().draw_string("fg", Vec2::zero(), Color::WHITE, 1.0);
        r.draw_texture(Vec2::new(3.0, 4.0), Color::WHITE, tex, 1.0);
        r.end();

        let kinds: Vec<&'static str> = r
            .backend()
            .calls
            .iter()
            .map(|c| match c {
                Call::BeginFrame => "begin",
                Call::BindGeometry => "bind",
                Call::WriteVertices(_) => "upload",
                Call::Draw(..) => "draw",
                Call::Text(..) => "text",
                Call::BeginSprites => "sprites{",
                Call::Sprite(..) => "sprite",
                Call::EndSprites => "}sprites",
                Call::RestoreBlend => "blend",
                Call::Present(_) => "present",
                _ => "other",
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                "begin", "bind", // begin()
                "upload", "draw", "text", // background
                "bind", "upload", "draw", // foreground geometry
                "sprites{", "sprite", "}sprites", // textures
                "text", "blend", "present",
            ]
        );
    }

    #[test]
    fn next_frame_starts_empty() {
        let mut r = ready(800, 600);
        r.begin();
        r.background().draw_filled_rect(Rect::new(0.0, 0.0, 50.0, 50.0), Color::BLUE);
        r.foreground().draw_string("first", Vec2::zero(), Color::WHITE, 1.0);
        r.end();

        r.begin();
        r.foreground().draw_line(Vec2::zero(), Vec2::new(9.0, 9.0), Color::WHITE);
        r.end();

        let frame = r.backend().frame_calls();
        assert_eq!(frame.first(), Some(&Call::BeginFrame));
        let draws: Vec<&Call> = frame.iter().filter(|c| matches!(c, Call::Draw(..))).collect();
        assert_eq!(draws, vec![&Call::Draw(Topology::LineList, 2, 0)]);
        assert!(!frame.iter().any(|c| matches!(c, Call::Text(..))));
    }

    #[test]
    fn end_without_begin_still_submits() {
        let mut r = ready(800, 600);
        r.foreground()
            .draw_filled_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        r.end();
        assert!(r.backend().calls.contains(&Call::Present(r.vsync())));
        assert!(r.foreground().is_empty());
    }

    #[test]
    fn begin_is_noop_while_resizing() {
        let mut r = ready(800, 600);
        r.resizing = true;
        r.begin();
        assert!(r.backend().calls.is_empty());

        r.foreground().draw_dot(Vec2::zero(), Color::WHITE);
        r.end();
        assert!(r.backend().calls.is_empty());
        assert!(r.foreground().is_empty());
    }

    #[test]
    fn accumulators_empty_after_failed_present() {
        let mut r = ready(800, 600);
        r.backend_mut().fail("present");
        r.foreground().draw_dot(Vec2::zero(), Color::WHITE);
        r.end();
        assert!(r.foreground().is_empty());
        assert_eq!(r.state(), RendererState::Lost);
    }
}
