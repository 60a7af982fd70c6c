use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::error::AudioError;

use super::{AudioSink, Playback, SoundClip};

/// Upper bound on simultaneously playing clips; the oldest voice is cut.
const MAX_VOICES: usize = 32;

struct Voice {
    samples: Arc<[f32]>,
    channels: usize,
    cursor: f64,
    step: f64,
    gain: (f32, f32),
}

impl Voice {
    fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Next stereo frame, or `None` once the clip is exhausted.
    fn next(&mut self) -> Option<(f32, f32)> {
        let frame = self.cursor as usize;
        if frame >= self.frames() {
            return None;
        }
        let base = frame * self.channels;
        let (l, r) = if self.channels == 1 {
            (self.samples[base], self.samples[base])
        } else {
            (self.samples[base], self.samples[base + 1])
        };
        self.cursor += self.step;
        Some((l * self.gain.0, r * self.gain.1))
    }
}

/// Mixing sink on the default output device.
pub struct CpalSink {
    voices: Arc<Mutex<Vec<Voice>>>,
    sample_rate: u32,
    _stream: Stream,
}

impl CpalSink {
    pub fn open_default() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Output("no default output device".into()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Output(format!("output config: {e}")))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let voices = Arc::new(Mutex::new(Vec::new()));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, voices.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, voices.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, voices.clone())?,
            other => {
                return Err(AudioError::Output(format!(
                    "unsupported sample format {other:?}"
                )));
            }
        };
        stream
            .play()
            .map_err(|e| AudioError::Output(format!("start stream: {e}")))?;

        log::info!(
            "audio: output {} Hz, {} channels",
            config.sample_rate,
            config.channels
        );

        Ok(Self {
            voices,
            sample_rate: config.sample_rate,
            _stream: stream,
        })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    voices: Arc<Mutex<Vec<Voice>>>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let data_callback = move |out: &mut [T], _: &cpal::OutputCallbackInfo| {
        // A poisoned lock yields silence rather than a panic on the audio thread.
        let Ok(mut voices) = voices.lock() else {
            out.fill(T::from_sample(0.0));
            return;
        };

        for frame in out.chunks_mut(channels) {
            let (mut l, mut r) = (0.0f32, 0.0f32);
            voices.retain_mut(|v| match v.next() {
                Some((vl, vr)) => {
                    l += vl;
                    r += vr;
                    true
                }
                None => false,
            });
            let (l, r) = (l.clamp(-1.0, 1.0), r.clamp(-1.0, 1.0));
            for (ch, sample) in frame.iter_mut().enumerate() {
                let value = match ch {
                    0 => l,
                    1 => r,
                    _ => (l + r) * 0.5,
                };
                *sample = T::from_sample(value);
            }
        }
    };

    let err_fn = |err: cpal::StreamError| log::error!("audio: output stream error: {err}");

    device
        .build_output_stream(config, data_callback, err_fn, None)
        .map_err(|e| AudioError::Output(format!("build output stream: {e}")))
}

impl AudioSink for CpalSink {
    fn play(&mut self, clip: &SoundClip, playback: Playback) -> Result<(), AudioError> {
        let step = playback.rate() as f64 * clip.format.sample_rate as f64
            / self.sample_rate.max(1) as f64;
        let voice = Voice {
            samples: clip.samples.clone(),
            channels: clip.format.channels.max(1) as usize,
            cursor: 0.0,
            step,
            gain: playback.gains(),
        };

        let mut voices = self
            .voices
            .lock()
            .map_err(|_| AudioError::Output("mixer lock poisoned".into()))?;
        if voices.len() >= MAX_VOICES {
            voices.remove(0);
        }
        voices.push(voice);
        Ok(())
    }
}
