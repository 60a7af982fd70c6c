use crate::backend::gpu::GpuBackend;
use crate::coords::Viewport;
use crate::input::InputState;
use crate::render::RenderList;
use crate::renderer::Renderer;
use crate::time::FrameTime;
use crate::window::OverlayWindow;

/// Per-frame context passed to [`OverlayApp::on_frame`](super::OverlayApp::on_frame).
pub struct FrameCtx<'a> {
    pub renderer: &'a mut Renderer<GpuBackend>,
    pub window: &'a mut OverlayWindow,
    pub input: &'a mut InputState,
    pub time: FrameTime,
}

impl FrameCtx<'_> {
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.renderer.viewport()
    }

    #[inline]
    pub fn background(&mut self) -> &mut RenderList {
        self.renderer.background()
    }

    #[inline]
    pub fn foreground(&mut self) -> &mut RenderList {
        self.renderer.foreground()
    }
}
