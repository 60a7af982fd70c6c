//! Sound-effect registry and fire-and-forget playback.
//!
//! Clips are decoded once at load time (RIFF/WAVE via `hound`) and handed to an
//! [`AudioSink`]. Without the `cpal-output` feature the [`NullSink`] is used.

mod manager;
mod sink;
mod wav;

#[cfg(feature = "cpal-output")]
mod cpal_sink;

pub use manager::{AudioManager, SoundId, SoundSource, MAX_SOUNDS};
pub use sink::{AudioSink, NullSink, Playback};
pub use wav::{SoundClip, WaveFormat};

#[cfg(feature = "cpal-output")]
pub use cpal_sink::CpalSink;

#[cfg(test)]
pub(crate) use sink::testing::RecordingSink;

/// Default sink for this build: the `cpal` mixer when enabled and a device is
/// available, otherwise the null sink.
pub fn default_sink() -> Box<dyn AudioSink> {
    #[cfg(feature = "cpal-output")]
    {
        match CpalSink::open_default() {
            Ok(sink) => return Box::new(sink),
            Err(e) => log::warn!("audio: no output device, sounds are muted: {e}"),
        }
    }
    Box::new(NullSink)
}
