use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{
    HealthStatus, LegacyGenerateRequest, ModelList, ModelObject, SpeechRequest, VoiceList,
};
use crate::api::routes::{AppState, KNOWN_MODELS};
use crate::error::AppError;
use crate::tts::{Language, SynthesizedAudio};

pub async fn create_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::BadRequest)?;

    if !KNOWN_MODELS.contains(&request.model.as_str()) {
        return Err(AppError::ModelNotFound(request.model));
    }

    let audio = state.tts.speak(
        &request.input,
        &request.voice,
        request.effective_speed(),
        request.language.as_deref(),
        request.response_format,
    )?;

    tracing::info!(
        voice = %request.voice,
        format = %request.response_format,
        bytes = audio.bytes.len(),
        "Speech generated"
    );

    Ok(audio_response(audio))
}

/// Pre-OpenAI endpoint kept for older front-ends; always answers with WAV.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LegacyGenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let request = SpeechRequest::from(request);
    request.validate().map_err(AppError::BadRequest)?;

    let audio = state.tts.speak(
        &request.input,
        &request.voice,
        request.effective_speed(),
        request.language.as_deref(),
        request.response_format,
    )?;

    Ok(audio_response(audio))
}

fn audio_response(audio: SynthesizedAudio) -> Response {
    let disposition = format!(
        "attachment; filename=\"speech.{}\"",
        audio.format.extension()
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.bytes,
    )
        .into_response()
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelList> {
    let data = KNOWN_MODELS
        .iter()
        .map(|id| ModelObject {
            id: id.to_string(),
            object: "model".to_string(),
            created: state.started_at,
            owned_by: "kokoro".to_string(),
        })
        .collect();

    Json(ModelList::new(data))
}

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoiceList> {
    let data = state
        .tts
        .list_voices()
        .iter()
        .map(|voice| voice.to_object())
        .collect();

    Json(VoiceList::new(data))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        device_info: format!(
            "cpu (tone generator, {} Hz, v{})",
            state.tts.sample_rate(),
            env!("CARGO_PKG_VERSION")
        ),
        available_voices: state.tts.list_voices().into_iter().map(|v| v.id).collect(),
        available_languages: Language::ALL
            .iter()
            .map(|lang| lang.code().to_string())
            .collect(),
    })
}
