use crate::error::AudioError;

use super::SoundClip;

/// Per-playback parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Playback {
    /// Linear gain, `0` is silent.
    pub volume: f32,
    /// Octaves; playback rate is `2^pitch`.
    pub pitch: f32,
    /// `-1` full left, `0` centre, `1` full right.
    pub pan: f32,
}

impl Playback {
    /// Clamps pan to `[-1, 1]`, pitch to `[-1, 1]` octaves and volume to `>= 0`.
    pub fn sanitized(self) -> Self {
        Self {
            volume: self.volume.max(0.0),
            pitch: self.pitch.clamp(-1.0, 1.0),
            pan: self.pan.clamp(-1.0, 1.0),
        }
    }

    #[inline]
    pub fn rate(self) -> f32 {
        self.pitch.exp2()
    }

    /// Left/right gains for linear panning.
    pub fn gains(self) -> (f32, f32) {
        let left = (1.0 - self.pan).min(1.0);
        let right = (1.0 + self.pan).min(1.0);
        (self.volume * left, self.volume * right)
    }
}

/// Audio output device.
pub trait AudioSink {
    /// Starts playing `clip` without blocking.
    fn play(&mut self, clip: &SoundClip, playback: Playback) -> Result<(), AudioError>;
}

/// Discards every clip.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, clip: &SoundClip, playback: Playback) -> Result<(), AudioError> {
        log::trace!(
            "audio: null sink dropped {} frames ({playback:?})",
            clip.frames()
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records every `play` call; clones share the log.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingSink {
        pub plays: Rc<RefCell<Vec<(usize, Playback)>>>,
        pub fail: bool,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, clip: &SoundClip, playback: Playback) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Output("injected".into()));
            }
            self.plays.borrow_mut().push((clip.frames(), playback));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_octaves() {
        let p = Playback { volume: 1.0, pitch: 1.0, pan: 0.0 };
        assert_eq!(p.rate(), 2.0);
        assert_eq!(Playback { pitch: -1.0, ..p }.rate(), 0.5);
    }

    #[test]
    fn pan_gains() {
        let centre = Playback { volume: 0.5, pitch: 0.0, pan: 0.0 };
        assert_eq!(centre.gains(), (0.5, 0.5));
        assert_eq!(Playback { pan: 1.0, ..centre }.gains(), (0.0, 0.5));
        assert_eq!(Playback { pan: -1.0, ..centre }.gains(), (0.5, 0.0));
    }

    #[test]
    fn sanitize_clamps() {
        let p = Playback { volume: -1.0, pitch: 4.0, pan: -3.0 }.sanitized();
        assert_eq!(p, Playback { volume: 0.0, pitch: 1.0, pan: -1.0 });
    }
}
