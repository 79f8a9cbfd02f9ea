use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::{ErrorDetail, ErrorResponse};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported response format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("TTS generation failed: {0}")]
    TtsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::VoiceNotFound(_) | AppError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::TtsError(_) | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::VoiceNotFound(_) => "voice_not_found",
            AppError::ModelNotFound(_) => "model_not_found",
            AppError::BadRequest(_) => "invalid_request",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::Unauthorized => "invalid_api_key",
            AppError::TtsError(_) => "tts_error",
            AppError::IoError(_) => "io_error",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "authentication_error",
            AppError::TtsError(_) | AppError::IoError(_) => "server_error",
            _ => "invalid_request_error",
        }
    }
}

// Body rejections (bad JSON, wrong content type) answer 400 in the envelope
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed: {} - {}", code, message);
        } else {
            tracing::warn!("Request rejected: {} - {}", code, message);
        }

        (
            status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    message,
                    kind: self.kind().to_string(),
                    code: Some(code.to_string()),
                },
            }),
        )
            .into_response()
    }
}

/// Coarse classification of client-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection refused, DNS failure, timeout and the like.
    Transport,
    /// The server answered with a non-2xx status.
    Status,
    Decode,
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorCategory::Transport => "transport failure",
            ErrorCategory::Status => "HTTP status",
            ErrorCategory::Decode => "decode failure",
            ErrorCategory::Io => "IO failure",
        };
        f.write_str(label)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport(e) if e.is_decode() => ErrorCategory::Decode,
            ClientError::Transport(_) => ErrorCategory::Transport,
            ClientError::Api { .. } => ErrorCategory::Status,
            ClientError::Decode(_) => ErrorCategory::Decode,
            ClientError::Io(_) => ErrorCategory::Io,
        }
    }

    /// HTTP status of the failed exchange, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
