//! halo engine crate.
//!
//! A click-through overlay window with a batched immediate-mode 2D renderer.
//! Application code draws into the background/foreground [`render::RenderList`]s
//! and the texture queue during a frame; [`renderer::Renderer::end`] flushes
//! everything through the backend in a handful of submissions.

pub mod audio;
pub mod backend;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod texture;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
