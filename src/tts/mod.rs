pub mod tone;
pub mod voice;

use crate::api::ResponseFormat;
use crate::error::AppError;

pub use tone::ToneSynth;
pub use voice::{Gender, Language, VoiceInfo};

/// Encoded audio plus the format it was encoded in.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub format: ResponseFormat,
    pub bytes: Vec<u8>,
}

impl SynthesizedAudio {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

pub struct TtsService {
    synth: ToneSynth,
}

impl TtsService {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            synth: ToneSynth::new(sample_rate),
        }
    }

    pub fn speak(
        &self,
        text: &str,
        voice_id: &str,
        speed: f32,
        language: Option<&str>,
        format: ResponseFormat,
    ) -> Result<SynthesizedAudio, AppError> {
        // 1. Resolve voice and language
        let voice = voice::find_voice(voice_id)?;
        let language = match language {
            Some(code) => code.parse::<Language>()?,
            None => voice.language,
        };

        // 2. Check the format before doing any work
        if !Self::supports(format) {
            return Err(AppError::UnsupportedFormat(format!(
                "'{}' (this server encodes wav and pcm)",
                format
            )));
        }

        tracing::debug!(
            voice = %voice.id,
            language = %language,
            speed,
            format = %format,
            chars = text.chars().count(),
            "Synthesizing speech"
        );

        // 3. Synthesize
        let samples = self.synth.synthesize(text, voice.gender, speed);
        if samples.is_empty() {
            return Err(AppError::TtsError("Synthesis produced no audio".into()));
        }

        // 4. Encode
        let bytes = match format {
            ResponseFormat::Wav => tone::samples_to_wav(&samples, self.synth.sample_rate())?,
            ResponseFormat::Pcm => tone::samples_to_pcm(&samples),
            other => return Err(AppError::UnsupportedFormat(other.to_string())),
        };

        Ok(SynthesizedAudio { format, bytes })
    }

    pub fn supports(format: ResponseFormat) -> bool {
        matches!(format, ResponseFormat::Wav | ResponseFormat::Pcm)
    }

    pub fn list_voices(&self) -> Vec<VoiceInfo> {
        voice::catalog()
    }

    pub fn sample_rate(&self) -> u32 {
        self.synth.sample_rate()
    }
}

impl Default for TtsService {
    fn default() -> Self {
        Self::new(tone::DEFAULT_SAMPLE_RATE)
    }
}
