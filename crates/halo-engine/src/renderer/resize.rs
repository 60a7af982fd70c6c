use crate::backend::Backend;
use crate::config::SampleDesc;
use crate::coords::Viewport;
use crate::error::BackendError;

use super::{Renderer, RendererState, SHARED_VERTICES};

impl<B: Backend> Renderer<B> {
    /// Runs `op` with the resize guard raised. The guard is always lowered
    /// afterwards; a failure marks the surface `Lost` until a later rebuild succeeds.
    fn guarded(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut Self) -> Result<(), BackendError>,
    ) -> Result<(), BackendError> {
        if !matches!(self.state, RendererState::Ready | RendererState::Lost) {
            log::debug!("renderer: {what} ignored, renderer not initialized");
            return Err(BackendError::NotReady("renderer not initialized"));
        }

        self.resizing = true;
        self.frame_active = false;
        let result = op(self);
        self.resizing = false;

        match &result {
            Ok(()) => self.state = RendererState::Ready,
            Err(e) => {
                log::error!("renderer: {what} failed: {e}");
                self.state = RendererState::Lost;
            }
        }
        result
    }

    /// Rebuilds the back buffer and everything sized by it after the surface
    /// changed, and drops any geometry accumulated for the old size.
    fn rebuild_surface_state(&mut self) -> Result<(), BackendError> {
        let (w, h) = self.backend.create_render_target()?;
        self.apply_viewport(Viewport::from_size(w, h));

        self.background.clear();
        self.foreground.clear();
        self.textures.clear();

        self.backend.release_vertex_buffer();
        self.backend.create_vertex_buffer(SHARED_VERTICES)?;

        self.backend.release_projection();
        self.backend.create_projection(self.projection())?;

        self.textures.on_resize(&mut self.backend);
        Ok(())
    }

    /// Resizes the swapchain to the new client size.
    ///
    /// A zero-sized (minimized) window is ignored.
    pub fn on_window_resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            log::debug!("renderer: ignoring resize to {width}×{height}");
            return Ok(());
        }

        self.guarded("resize", |r| {
            r.backend.release_render_target();
            r.backend.resize_buffers(width, height)?;
            r.rebuild_surface_state()
        })
    }

    /// Enters or leaves fullscreen; the viewport follows the resized back buffer.
    pub fn window_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        self.guarded("fullscreen toggle", |r| {
            r.backend.release_render_target();
            r.backend.set_fullscreen(fullscreen)?;
            r.fullscreen = fullscreen;
            r.rebuild_surface_state()
        })
    }

    /// Sets the present interval, clamped to `1..=3`.
    pub fn set_vsync(&mut self, interval: u32) -> Result<(), BackendError> {
        self.clamp_vsync(interval);
        self.apply_swapchain("vsync change")
    }

    /// Presents without waiting for vertical blank.
    pub fn disable_vsync(&mut self) -> Result<(), BackendError> {
        self.vsync = 0;
        self.apply_swapchain("vsync change")
    }

    /// Rebuilds the pipeline and swapchain with a new multisample description.
    pub fn apply_aa_settings(&mut self, samples: SampleDesc) -> Result<(), BackendError> {
        self.guarded("antialiasing change", |r| {
            r.backend.release_render_target();
            let effective = r.backend.create_pipeline(samples)?;
            if effective != samples {
                log::warn!(
                    "renderer: {} samples unsupported, using {}",
                    samples.count,
                    effective.count
                );
            }
            r.samples = effective;
            r.backend.recreate_swapchain(effective, r.vsync)?;
            r.rebuild_surface_state()
        })
    }

    /// Replaces the text font with a raw font file.
    pub fn change_font(&mut self, font: Vec<u8>) -> Result<(), BackendError> {
        self.guarded("font change", |r| {
            r.backend.load_font(&font)?;
            r.font = Some(font);
            Ok(())
        })
    }

    fn apply_swapchain(&mut self, what: &str) -> Result<(), BackendError> {
        self.guarded(what, |r| {
            r.backend.release_render_target();
            r.backend.recreate_swapchain(r.samples, r.vsync)?;
            r.rebuild_surface_state()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::testing::Call;
    use crate::config::SampleDesc;
    use crate::coords::{Rect, Vec2, Viewport};
    use crate::paint::Color;
    use crate::renderer::test_util::{ready, renderer};
    use crate::renderer::RendererState;

    #[test]
    fn resize_updates_viewport_and_empties_lists() {
        let mut r = ready(800, 600);
        r.foreground()
            .draw_filled_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        r.background().draw_string("x", Vec2::zero(), Color::WHITE, 1.0);

        r.on_window_resize(1920, 1080).expect("resize");

        assert_eq!(r.viewport(), Viewport::new(1920.0, 1080.0));
        assert_eq!(r.foreground().viewport(), Viewport::new(1920.0, 1080.0));
        assert!(r.foreground().is_empty());
        assert_eq!(r.background().text_len(), 0);
        assert!(!r.is_resizing());
        assert_eq!(r.state(), RendererState::Ready);

        let calls = &r.backend().calls;
        assert_eq!(calls[0], Call::ReleaseRenderTarget);
        assert_eq!(calls[1], Call::ResizeBuffers(1920, 1080));
        assert!(calls.contains(&Call::CreateVertexBuffer(super::SHARED_VERTICES)));
        assert!(calls.contains(&Call::CreateProjection));
    }

    #[test]
    fn failed_resize_clears_guard_and_recovers() {
        let mut r = ready(800, 600);
        r.backend_mut().fail("resize_buffers");

        assert!(r.on_window_resize(1024, 768).is_err());
        assert!(!r.is_resizing());
        assert_eq!(r.state(), RendererState::Lost);

        // No frame while lost.
        r.backend_mut().calls.clear();
        r.begin();
        assert!(r.backend().calls.is_empty());

        r.backend_mut().heal("resize_buffers");
        r.on_window_resize(1024, 768).expect("resize");
        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(r.viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn minimized_resize_is_ignored() {
        let mut r = ready(800, 600);
        r.on_window_resize(0, 0).expect("ignored");
        assert!(r.backend().calls.is_empty());
        assert_eq!(r.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn resize_before_initialize_is_rejected() {
        let mut r = renderer(800, 600);
        assert!(r.on_window_resize(640, 480).is_err());
        assert!(r.backend().calls.is_empty());
        assert!(!r.is_resizing());
    }

    #[test]
    fn resize_keeps_texture_ids() {
        let mut r = ready(800, 600);
        let id = r.add_texture("radar.png");
        r.on_window_resize(1280, 720).expect("resize");
        assert!(r.textures().contains(id));
        assert_eq!(r.backend().texture_loads, 2);
    }

    #[test]
    fn vsync_is_clamped_and_disable_sets_zero() {
        let mut r = ready(800, 600);
        r.set_vsync(7).expect("vsync");
        assert_eq!(r.vsync(), 3);
        assert!(r
            .backend()
            .calls
            .contains(&Call::RecreateSwapchain(SampleDesc::default(), 3)));

        r.disable_vsync().expect("vsync");
        assert_eq!(r.vsync(), 0);
    }

    #[test]
    fn aa_settings_fall_back() {
        let mut r = ready(800, 600);
        r.backend_mut().max_samples = 4;
        r.apply_aa_settings(SampleDesc::new(8, 0)).expect("aa");
        assert_eq!(r.samples(), SampleDesc::new(4, 0));

        r.backend_mut().max_samples = 1;
        r.apply_aa_settings(SampleDesc::new(8, 0)).expect("aa");
        assert_eq!(r.samples(), SampleDesc::NONE);
    }

    #[test]
    fn fullscreen_toggle_tracks_state() {
        let mut r = ready(800, 600);
        r.window_fullscreen(true).expect("fullscreen");
        assert!(r.is_fullscreen());
        assert!(r.backend().calls.contains(&Call::SetFullscreen(true)));

        r.backend_mut().fail("set_fullscreen");
        assert!(r.window_fullscreen(false).is_err());
        assert!(r.is_fullscreen());
        assert!(!r.is_resizing());
    }

    #[test]
    fn change_font_reloads() {
        let mut r = ready(800, 600);
        r.change_font(vec![1, 2, 3]).expect("font");
        assert_eq!(r.backend().calls, vec![Call::LoadFont]);
        assert!(!r.is_resizing());
    }
}
