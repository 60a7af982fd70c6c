//! Error types.
//!
//! Every fallible engine operation reports through one of these enums. The
//! sentinel-returning convenience APIs (`add_texture`, `add_sound_effect`) log
//! the error and hand back an invalid id instead.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a rendering backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// No adapter/device could be created for the surface.
    #[error("device creation failed: {0}")]
    Device(String),

    /// Surface (swapchain) creation or configuration failed.
    #[error("surface error: {0}")]
    Surface(String),

    /// Back-buffer / render-target acquisition failed.
    #[error("render target error: {0}")]
    RenderTarget(String),

    /// Shader, pipeline or fixed-function state creation failed.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Vertex or constant buffer creation failed.
    #[error("buffer error: {0}")]
    Buffer(String),

    /// Font parsing or text-backend creation failed.
    #[error("font error: {0}")]
    Font(String),

    /// Texture decode or upload failed.
    #[error("texture error: {0}")]
    Texture(String),

    /// An operation was attempted before the corresponding resource exists.
    #[error("backend not ready: {0}")]
    NotReady(&'static str),

    /// The backend needs to be torn down (e.g. out of memory while presenting).
    #[error("fatal backend error: {0}")]
    Fatal(String),
}

/// The ordered initialization steps of the renderer; used to report which one failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InitStep {
    Devices,
    BackBuffer,
    Pipeline,
    VertexBuffer,
    Projection,
    Font,
}

/// Renderer initialization failure.
#[derive(Error, Debug)]
#[error("renderer initialization failed at {step:?}: {source}")]
pub struct InitError {
    pub step: InitStep,
    #[source]
    pub source: BackendError,
}

/// Texture registry failure.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The backend could not decode or upload the image.
    #[error("failed to load texture from {origin}: {source}")]
    Load {
        origin: String,
        #[source]
        source: BackendError,
    },

    /// A memory source with zero bytes.
    #[error("texture buffer is empty")]
    EmptyBuffer,
}

/// Audio registry / playback failure.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The sound registry already holds its maximum number of entries.
    #[error("sound registry is full ({capacity} entries)")]
    RegistryFull { capacity: usize },

    /// A raw buffer with zero bytes.
    #[error("sound buffer is empty")]
    EmptyBuffer,

    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The RIFF/WAVE payload could not be parsed or decoded.
    #[error("invalid wave data: {0}")]
    Decode(#[from] hound::Error),

    /// The wave format is valid but not playable (e.g. zero channels).
    #[error("unsupported wave format: {0}")]
    UnsupportedFormat(String),

    /// The audio output device rejected the clip or the stream failed.
    #[error("audio output error: {0}")]
    Output(String),
}
