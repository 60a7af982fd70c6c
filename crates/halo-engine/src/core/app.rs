use crate::backend::gpu::GpuBackend;
use crate::renderer::Renderer;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application hooks driven by [`Runtime`](crate::window::Runtime).
pub trait OverlayApp {
    /// Called once after the renderer initialized. Load textures and sounds here.
    fn on_start(&mut self, renderer: &mut Renderer<GpuBackend>) {
        let _ = renderer;
    }

    /// Called once per frame between `begin` and `end`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
