//! Geometry types shared by the render lists, the renderer and the backends.
//!
//! Canonical CPU space:
//! - output-surface pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! The backend converts to clip space with an orthographic projection built from
//! the current [`Viewport`].

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
