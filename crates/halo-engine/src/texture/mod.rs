//! Persistent texture registry plus the per-frame sprite queue.

mod manager;
mod origin;

pub use manager::{TextureDrawRequest, TextureId, TextureManager, MAX_TEXTURES};
pub use origin::TextureOrigin;
