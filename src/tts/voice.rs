use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::api::VoiceObject;
use crate::error::AppError;

/// Voices shipped with the Kokoro model.
pub const KOKORO_VOICES: &[&str] = &[
    "af_alloy", "af_aoede", "af_bella", "af_heart", "af_jessica", "af_kore", "af_nicole",
    "af_nova", "af_river", "af_sarah", "af_sky", "am_adam", "am_echo", "am_eric", "am_fenrir",
    "am_liam", "am_michael", "am_onyx", "am_puck", "am_santa", "bf_alice", "bf_emma",
    "bf_isabella", "bf_lily", "bm_daniel", "bm_fable", "bm_george", "bm_lewis",
];

lazy_static! {
    // Pattern: <language><gender>_<name> (e.g., af_heart, bm_lewis)
    static ref VOICE_ID_REGEX: Regex = Regex::new(r"^([a-z])([fm])_([a-z]+)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    AmericanEnglish,
    BritishEnglish,
    Spanish,
    French,
    Hindi,
    Italian,
    Japanese,
    BrazilianPortuguese,
    Mandarin,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::AmericanEnglish,
        Language::BritishEnglish,
        Language::Spanish,
        Language::French,
        Language::Hindi,
        Language::Italian,
        Language::Japanese,
        Language::BrazilianPortuguese,
        Language::Mandarin,
    ];

    /// Single-letter code used on the wire (`language` field).
    pub fn code(self) -> &'static str {
        match self {
            Language::AmericanEnglish => "a",
            Language::BritishEnglish => "b",
            Language::Spanish => "e",
            Language::French => "f",
            Language::Hindi => "h",
            Language::Italian => "i",
            Language::Japanese => "j",
            Language::BrazilianPortuguese => "p",
            Language::Mandarin => "z",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::AmericanEnglish => "American English",
            Language::BritishEnglish => "British English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::Hindi => "Hindi",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::BrazilianPortuguese => "Portuguese (BR)",
            Language::Mandarin => "Mandarin Chinese",
        }
    }

    // Accent label used in voice display names
    fn accent(self) -> &'static str {
        match self {
            Language::AmericanEnglish => "American",
            Language::BritishEnglish => "British",
            other => other.display_name(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown language code '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub gender: Gender,
}

impl VoiceInfo {
    /// Derives language, gender and display name from a Kokoro voice id.
    pub fn parse(id: &str) -> Result<Self, AppError> {
        let caps = VOICE_ID_REGEX
            .captures(id)
            .ok_or_else(|| AppError::VoiceNotFound(id.to_string()))?;

        let language: Language = caps[1]
            .parse()
            .map_err(|_| AppError::VoiceNotFound(id.to_string()))?;
        let gender = if &caps[2] == "f" {
            Gender::Female
        } else {
            Gender::Male
        };

        let gender_label = match gender {
            Gender::Female => "Female",
            Gender::Male => "Male",
        };
        let name = format!(
            "{} {} ({})",
            language.accent(),
            gender_label,
            capitalize(&caps[3])
        );

        Ok(Self {
            id: id.to_string(),
            name,
            language,
            gender,
        })
    }

    pub fn to_object(&self) -> VoiceObject {
        VoiceObject {
            id: self.id.clone(),
            name: self.name.clone(),
            language: self.language.code().to_string(),
        }
    }
}

/// Looks up a voice from the catalog.
pub fn find_voice(id: &str) -> Result<VoiceInfo, AppError> {
    if !KOKORO_VOICES.contains(&id) {
        return Err(AppError::VoiceNotFound(id.to_string()));
    }
    VoiceInfo::parse(id)
}

pub fn catalog() -> Vec<VoiceInfo> {
    KOKORO_VOICES
        .iter()
        .filter_map(|id| VoiceInfo::parse(id).ok())
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
