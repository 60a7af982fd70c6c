//! Contract between the window runtime and the application drawing the overlay.

mod app;
mod ctx;

pub use app::{AppControl, OverlayApp};
pub use ctx::FrameCtx;
