use crate::backend::Backend;
use crate::coords::Viewport;
use crate::error::{BackendError, InitError, InitStep};
use crate::render::orthographic_off_center;

use super::{Renderer, RendererState, SHARED_VERTICES};

impl<B: Backend> Renderer<B> {
    /// Runs the ordered setup steps for a `width × height` surface.
    ///
    /// The first failing step is logged, the renderer becomes `Failed` and the
    /// remaining steps are skipped. Calling this on a ready renderer is a no-op.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), InitError> {
        match self.state {
            RendererState::Ready | RendererState::Lost => return Ok(()),
            RendererState::Failed => {
                return Err(InitError {
                    step: InitStep::Devices,
                    source: BackendError::NotReady("renderer previously failed to initialize"),
                });
            }
            RendererState::Uninitialized | RendererState::Initializing => {}
        }

        self.state = RendererState::Initializing;
        match self.run_init_steps(width, height) {
            Ok(()) => {
                self.state = RendererState::Ready;
                log::info!(
                    "renderer: ready ({}×{}, {}x MSAA, vsync {})",
                    self.viewport.width,
                    self.viewport.height,
                    self.samples.count,
                    self.vsync
                );
                Ok(())
            }
            Err(e) => {
                log::error!("{e}");
                self.state = RendererState::Failed;
                Err(e)
            }
        }
    }

    fn run_init_steps(&mut self, width: u32, height: u32) -> Result<(), InitError> {
        fn at(step: InitStep) -> impl FnOnce(BackendError) -> InitError {
            move |source| InitError { step, source }
        }

        let width = width.max(1);
        let height = height.max(1);

        self.backend
            .create_device(width, height, self.samples, self.vsync)
            .map_err(at(InitStep::Devices))?;

        let (w, h) = self
            .backend
            .create_render_target()
            .map_err(at(InitStep::BackBuffer))?;

        let effective = self
            .backend
            .create_pipeline(self.samples)
            .map_err(at(InitStep::Pipeline))?;
        if effective != self.samples {
            log::warn!(
                "renderer: {} samples unsupported, using {}",
                self.samples.count,
                effective.count
            );
            self.samples = effective;
        }

        self.backend
            .create_vertex_buffer(SHARED_VERTICES)
            .map_err(at(InitStep::VertexBuffer))?;

        self.apply_viewport(Viewport::from_size(w, h));

        self.backend
            .create_projection(self.projection())
            .map_err(at(InitStep::Projection))?;

        match self.font.as_deref() {
            Some(font) => self
                .backend
                .load_font(font)
                .map_err(at(InitStep::Font))?,
            None => log::warn!("renderer: no font available, text will not be drawn"),
        }

        if self.fullscreen {
            // Not part of the ordered steps; a refusal leaves a windowed overlay.
            if let Err(e) = self.backend.set_fullscreen(true) {
                log::warn!("renderer: fullscreen unavailable: {e}");
                self.fullscreen = false;
            }
        }

        Ok(())
    }

    /// Stores the viewport and pushes it to the backend and both lists.
    pub(super) fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.backend.set_viewport(viewport);
        self.background.set_viewport(viewport);
        self.foreground.set_viewport(viewport);
    }

    pub(super) fn projection(&self) -> [[f32; 4]; 4] {
        orthographic_off_center(
            0.0,
            self.viewport.width,
            self.viewport.height,
            0.0,
            0.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::Call;
    use crate::config::SampleDesc;
    use crate::renderer::test_util::renderer;

    #[test]
    fn steps_run_in_order() {
        let mut r = renderer(800, 600);
        r.initialize(800, 600).expect("initialize");

        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(
            r.backend().calls,
            vec![
                Call::CreateDevice(800, 600),
                Call::CreateRenderTarget,
                Call::CreatePipeline(SampleDesc::default()),
                Call::CreateVertexBuffer(SHARED_VERTICES),
                Call::SetViewport(Viewport::new(800.0, 600.0)),
                Call::CreateProjection,
                Call::LoadFont,
            ]
        );
    }

    #[test]
    fn failing_step_aborts_the_rest() {
        let mut r = renderer(800, 600);
        r.backend_mut().fail("create_pipeline");

        let err = r.initialize(800, 600).expect_err("pipeline failure");
        assert_eq!(err.step, InitStep::Pipeline);
        assert_eq!(r.state(), RendererState::Failed);
        assert_eq!(r.backend().calls.len(), 3);

        // Terminal: a retry does not touch the backend again.
        r.backend_mut().heal("create_pipeline");
        assert!(r.initialize(800, 600).is_err());
        assert_eq!(r.backend().calls.len(), 3);
    }

    #[test]
    fn unsupported_sample_count_falls_back() {
        let mut r = renderer(800, 600);
        r.backend_mut().max_samples = 1;
        r.initialize(800, 600).expect("initialize");
        assert_eq!(r.samples(), SampleDesc::NONE);
    }

    #[test]
    fn font_failure_reports_font_step() {
        let mut r = renderer(800, 600);
        r.backend_mut().fail("load_font");
        let err = r.initialize(800, 600).expect_err("font failure");
        assert_eq!(err.step, InitStep::Font);
    }
}
