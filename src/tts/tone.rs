use std::f32::consts::TAU;
use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AppError;
use crate::tts::voice::Gender;

/// Kokoro's native output rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;

// Length of one character's tone burst at speed 1.0
const CHAR_MILLIS: f32 = 60.0;
const AMPLITUDE: f32 = 0.3;

/// Stand-in synthesizer: one short sine burst per character, silence on
/// whitespace. Output length scales with `1 / speed`.
#[derive(Debug, Clone)]
pub struct ToneSynth {
    sample_rate: u32,
}

impl ToneSynth {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn synthesize(&self, text: &str, gender: Gender, speed: f32) -> Vec<f32> {
        if text.is_empty() || speed <= 0.0 {
            return Vec::new();
        }

        let base_hz = match gender {
            Gender::Female => 440.0,
            Gender::Male => 220.0,
        };
        let burst_len = (self.sample_rate as f32 * CHAR_MILLIS / 1000.0 / speed).round() as usize;
        let burst_len = burst_len.max(1);

        let mut samples = Vec::with_capacity(burst_len * text.chars().count());
        for ch in text.chars() {
            if ch.is_whitespace() {
                samples.extend(std::iter::repeat(0.0).take(burst_len));
                continue;
            }

            // Small per-character pitch offset so words don't sound flat
            let hz = base_hz + (ch as u32 % 12) as f32 * 15.0;
            for n in 0..burst_len {
                let t = n as f32 / self.sample_rate as f32;
                let envelope = fade(n, burst_len);
                samples.push((TAU * hz * t).sin() * AMPLITUDE * envelope);
            }
        }

        samples
    }
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

// Linear attack/release over the first and last tenth of a burst
fn fade(n: usize, len: usize) -> f32 {
    let ramp = (len / 10).max(1);
    if n < ramp {
        n as f32 / ramp as f32
    } else if n >= len - ramp {
        (len - n) as f32 / ramp as f32
    } else {
        1.0
    }
}

/// Clamps a `[-1.0, 1.0]` sample to signed 16-bit.
fn to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}

fn wav_error(stage: &str, err: hound::Error) -> AppError {
    AppError::TtsError(format!("WAV {} failed: {}", stage, err))
}

/// 16-bit mono RIFF/WAVE container around `samples`.
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AppError> {
    // hound panics on a zero rate when writing the header
    if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
        return Err(AppError::TtsError(format!(
            "Unusable sample rate {} Hz",
            sample_rate
        )));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut wav = Vec::with_capacity(44 + samples.len() * 2);
    let mut writer =
        WavWriter::new(Cursor::new(&mut wav), spec).map_err(|e| wav_error("header", e))?;
    let mut pcm = writer.get_i16_writer(samples.len() as u32);
    for sample in samples {
        pcm.write_sample(to_i16(*sample));
    }
    pcm.flush().map_err(|e| wav_error("write", e))?;
    writer.finalize().map_err(|e| wav_error("finalize", e))?;

    Ok(wav)
}

/// Raw 16-bit little-endian mono PCM, no header
pub fn samples_to_pcm(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|sample| to_i16(*sample).to_le_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_only_for_silence() {
        let wav = samples_to_wav(&[], DEFAULT_SAMPLE_RATE).unwrap();
        assert_eq!(wav.len(), 44);
        assert_eq!(&wav[36..40], b"data");
    }

    #[test]
    fn wav_rejects_zero_sample_rate() {
        let err = samples_to_wav(&[0.1, 0.2], 0).unwrap_err();
        assert!(matches!(err, AppError::TtsError(_)));
    }

    #[test]
    fn wav_carries_two_bytes_per_sample() {
        let samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let wav = samples_to_wav(&samples, 22050).unwrap();
        assert!(wav.starts_with(b"RIFF"));
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn test_pcm_is_two_bytes_per_sample() {
        let pcm = samples_to_pcm(&[0.0, 1.0, -1.0]);
        assert_eq!(pcm.len(), 6);
        assert_eq!(&pcm[0..2], &[0, 0]);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), i16::MAX);
    }

    #[test]
    fn test_burst_per_character() {
        let synth = ToneSynth::default();
        let one = synth.synthesize("a", Gender::Female, 1.0).len();
        let five = synth.synthesize("ab cd", Gender::Female, 1.0).len();
        assert_eq!(one, 1440);
        assert_eq!(five, one * 5);
    }

    #[test]
    fn test_faster_speed_is_shorter() {
        let synth = ToneSynth::default();
        let normal = synth.synthesize("Hello world", Gender::Male, 1.0).len();
        let fast = synth.synthesize("Hello world", Gender::Male, 2.0).len();
        assert!(fast < normal);
        assert_eq!(fast * 2, normal);
    }

    #[test]
    fn test_samples_stay_in_range() {
        let synth = ToneSynth::default();
        let samples = synth.synthesize("Range check!", Gender::Female, 1.3);
        assert!(samples.iter().all(|s| s.abs() <= AMPLITUDE));
    }

    #[test]
    fn test_empty_text_is_silent() {
        assert!(ToneSynth::default().synthesize("", Gender::Male, 1.0).is_empty());
    }
}
