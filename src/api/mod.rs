pub mod handlers;
pub mod routes;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Longest `input` accepted by `/v1/audio/speech`, in characters.
pub const MAX_INPUT_CHARS: usize = 4096;

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

/// Audio container requested through `response_format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    #[default]
    Wav,
    Pcm,
}

impl ResponseFormat {
    pub const ALL: [ResponseFormat; 6] = [
        ResponseFormat::Mp3,
        ResponseFormat::Opus,
        ResponseFormat::Aac,
        ResponseFormat::Flac,
        ResponseFormat::Wav,
        ResponseFormat::Pcm,
    ];

    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::Mp3 => "audio/mpeg",
            ResponseFormat::Opus => "audio/opus",
            ResponseFormat::Aac => "audio/aac",
            ResponseFormat::Flac => "audio/flac",
            ResponseFormat::Wav => "audio/wav",
            ResponseFormat::Pcm => "audio/pcm",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ResponseFormat::Mp3 => "mp3",
            ResponseFormat::Opus => "opus",
            ResponseFormat::Aac => "aac",
            ResponseFormat::Flac => "flac",
            ResponseFormat::Wav => "wav",
            ResponseFormat::Pcm => "pcm",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown response format '{}'", s))
    }
}

/// Body of `POST /v1/audio/speech`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
    #[serde(default)]
    pub response_format: ResponseFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SpeechRequest {
    pub fn new(
        model: impl Into<String>,
        voice: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            voice: voice.into(),
            input: input.into(),
            response_format: ResponseFormat::default(),
            speed: None,
            language: None,
        }
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Speed the server should synthesize at, `1.0` when unset.
    pub fn effective_speed(&self) -> f32 {
        self.speed.unwrap_or(1.0)
    }

    /// Checks the field-level constraints every conformant server enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.trim().is_empty() {
            return Err("Input text cannot be empty".into());
        }

        let chars = self.input.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(format!(
                "Input text too long ({} chars, max {})",
                chars, MAX_INPUT_CHARS
            ));
        }

        if self.model.trim().is_empty() {
            return Err("Model cannot be empty".into());
        }

        if self.voice.trim().is_empty() {
            return Err("Voice cannot be empty".into());
        }

        if let Some(speed) = self.speed {
            if !speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
                return Err(format!(
                    "Speed must be between {} and {}, got {}",
                    MIN_SPEED, MAX_SPEED, speed
                ));
            }
        }

        Ok(())
    }
}

/// Body of the pre-OpenAI `POST /generate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyGenerateRequest {
    pub text: String,
    pub voice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl From<LegacyGenerateRequest> for SpeechRequest {
    fn from(legacy: LegacyGenerateRequest) -> Self {
        Self {
            model: "kokoro".to_string(),
            voice: legacy.voice,
            input: legacy.text,
            response_format: ResponseFormat::Wav,
            speed: legacy.speed,
            language: legacy.language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelObject {
    pub id: String,
    #[serde(default = "model_object_kind")]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub owned_by: String,
}

fn model_object_kind() -> String {
    "model".to_string()
}

fn list_kind() -> String {
    "list".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default = "list_kind")]
    pub object: String,
    #[serde(default)]
    pub data: Vec<ModelObject>,
}

impl ModelList {
    pub fn new(data: Vec<ModelObject>) -> Self {
        Self {
            object: list_kind(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceList {
    #[serde(default = "list_kind")]
    pub object: String,
    #[serde(default)]
    pub data: Vec<VoiceObject>,
}

impl VoiceList {
    pub fn new(data: Vec<VoiceObject>) -> Self {
        Self {
            object: list_kind(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub device_info: String,
    #[serde(default)]
    pub available_voices: Vec<String>,
    #[serde(default)]
    pub available_languages: Vec<String>,
}

/// OpenAI error envelope: `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: Option<String>,
}
