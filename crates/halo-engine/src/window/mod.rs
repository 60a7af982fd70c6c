//! Overlay window and the winit event loop that drives frames.

mod overlay;
mod runtime;
mod translate;

pub use overlay::OverlayWindow;
pub use runtime::Runtime;
