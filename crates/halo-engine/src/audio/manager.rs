use std::fmt;
use std::path::Path;

use crate::error::AudioError;

use super::{AudioSink, Playback, SoundClip};

/// Registry capacity. Full registries reject new clips; nothing is evicted.
pub const MAX_SOUNDS: usize = 10;

/// Sound handle. Ids start at 0 and are never reused; [`SoundId::INVALID`]
/// marks a failed load.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SoundId(i32);

impl SoundId {
    pub const INVALID: SoundId = SoundId(-1);

    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Debug for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SoundId({})", self.0)
    }
}

/// Where a clip comes from.
#[derive(Debug, Copy, Clone)]
pub enum SoundSource<'a> {
    File(&'a Path),
    /// A complete RIFF/WAVE file in memory.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for SoundSource<'a> {
    fn from(p: &'a Path) -> Self {
        SoundSource::File(p)
    }
}

impl<'a> From<&'a str> for SoundSource<'a> {
    fn from(p: &'a str) -> Self {
        SoundSource::File(Path::new(p))
    }
}

impl<'a> From<&'a [u8]> for SoundSource<'a> {
    fn from(b: &'a [u8]) -> Self {
        SoundSource::Bytes(b)
    }
}

pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    sounds: Vec<(SoundId, SoundClip)>,
    next_id: i32,
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("sounds", &self.sounds.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            sounds: Vec::with_capacity(MAX_SOUNDS),
            next_id: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn clip(&self, id: SoundId) -> Option<&SoundClip> {
        self.sounds.iter().find(|(i, _)| *i == id).map(|(_, c)| c)
    }

    /// Decodes and registers a clip.
    pub fn try_add_sound_effect<'a>(
        &mut self,
        source: impl Into<SoundSource<'a>>,
    ) -> Result<SoundId, AudioError> {
        if self.sounds.len() >= MAX_SOUNDS {
            return Err(AudioError::RegistryFull {
                capacity: MAX_SOUNDS,
            });
        }

        let clip = match source.into() {
            SoundSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| AudioError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                SoundClip::decode(&bytes)?
            }
            SoundSource::Bytes(bytes) => SoundClip::decode(bytes)?,
        };

        let id = SoundId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "audio: registered {id:?} ({} ch, {} Hz, {} frames)",
            clip.format.channels,
            clip.format.sample_rate,
            clip.frames()
        );
        self.sounds.push((id, clip));
        Ok(id)
    }

    /// Sentinel variant of [`try_add_sound_effect`](Self::try_add_sound_effect).
    pub fn add_sound_effect<'a>(&mut self, source: impl Into<SoundSource<'a>>) -> SoundId {
        match self.try_add_sound_effect(source) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("audio: {e}");
                SoundId::INVALID
            }
        }
    }

    /// Starts playback. Unknown ids are ignored.
    pub fn play_sound_effect(&mut self, id: SoundId, volume: f32, pitch: f32, pan: f32) {
        let Some((_, clip)) = self.sounds.iter().find(|(i, _)| *i == id) else {
            log::debug!("audio: play of unknown {id:?} ignored");
            return;
        };

        let playback = Playback { volume, pitch, pan }.sanitized();
        if let Err(e) = self.sink.play(clip, playback) {
            log::warn!("audio: playback of {id:?} failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::tests::wav_bytes;
    use crate::audio::RecordingSink;

    fn manager() -> (AudioManager, RecordingSink) {
        let sink = RecordingSink::default();
        (AudioManager::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn ids_are_sequential() {
        let (mut am, _) = manager();
        let bytes = wav_bytes(1, 44100, 10);
        assert_eq!(am.add_sound_effect(bytes.as_slice()).raw(), 0);
        assert_eq!(am.add_sound_effect(bytes.as_slice()).raw(), 1);
    }

    #[test]
    fn full_registry_rejects() {
        let (mut am, _) = manager();
        let bytes = wav_bytes(1, 44100, 10);
        for _ in 0..MAX_SOUNDS {
            assert!(am.add_sound_effect(bytes.as_slice()).is_valid());
        }
        assert!(matches!(
            am.try_add_sound_effect(bytes.as_slice()),
            Err(AudioError::RegistryFull { capacity: MAX_SOUNDS })
        ));
        assert_eq!(am.add_sound_effect(bytes.as_slice()), SoundId::INVALID);
        assert_eq!(am.len(), MAX_SOUNDS);
    }

    #[test]
    fn bad_input_returns_invalid() {
        let (mut am, _) = manager();
        assert_eq!(am.add_sound_effect(&[0u8; 0][..]), SoundId::INVALID);
        assert_eq!(am.add_sound_effect("does/not/exist.wav"), SoundId::INVALID);
        assert!(am.is_empty());
    }

    #[test]
    fn play_forwards_sanitized_params() {
        let (mut am, sink) = manager();
        let id = am.add_sound_effect(wav_bytes(2, 44100, 32).as_slice());
        am.play_sound_effect(id, 0.8, 0.0, 2.0);

        let plays = sink.plays.borrow();
        assert_eq!(plays.len(), 1);
        assert_eq!(plays[0].0, 32);
        assert_eq!(plays[0].1, Playback { volume: 0.8, pitch: 0.0, pan: 1.0 });
    }

    #[test]
    fn sink_failure_keeps_registry() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut am = AudioManager::new(Box::new(sink.clone()));
        let id = am.add_sound_effect(wav_bytes(1, 22050, 16).as_slice());
        assert!(id.is_valid());

        am.play_sound_effect(id, 1.0, 0.0, 0.0);
        am.play_sound_effect(id, 1.0, 0.0, 0.0);

        assert!(sink.plays.borrow().is_empty());
        assert_eq!(am.len(), 1);
    }

    #[test]
    fn invalid_id_is_ignored() {
        let (mut am, sink) = manager();
        am.play_sound_effect(SoundId::INVALID, 1.0, 0.0, 0.0);
        am.play_sound_effect(SoundId(7), 1.0, 0.0, 0.0);
        assert!(sink.plays.borrow().is_empty());
    }
}
