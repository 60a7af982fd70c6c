use std::io::Cursor;
use std::sync::Arc;

use hound::{SampleFormat, WavReader};

use crate::error::AudioError;

/// Format fields from the `fmt ` chunk.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WaveFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub block_align: u16,
}

/// A decoded clip: interleaved samples normalized to `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct SoundClip {
    pub format: WaveFormat,
    pub samples: Arc<[f32]>,
}

impl SoundClip {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }

    /// Parses a RIFF/WAVE buffer and decodes its PCM payload.
    pub fn decode(bytes: &[u8]) -> Result<SoundClip, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::EmptyBuffer);
        }

        let reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(AudioError::UnsupportedFormat(format!(
                "{} channels at {} Hz",
                spec.channels, spec.sample_rate
            )));
        }

        let format = WaveFormat {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            block_align: spec.channels * spec.bits_per_sample.div_ceil(8),
        };

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let full_scale = (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };

        Ok(SoundClip {
            format,
            samples: samples.into(),
        })
    }
}
