//! Input state for the overlay window.
//!
//! The public surface does not expose winit types; the window runtime
//! translates platform events into [`InputEvent`]s and feeds one
//! [`InputState`] per window.

mod state;
mod types;

pub use state::{CHAR_QUEUE_LEN, InputState};
pub use types::{InputEvent, Key, MouseButton};
