use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::error::AppError;
use crate::tts::TtsService;

/// Model ids accepted by `/v1/audio/speech`; the OpenAI ids are aliases.
pub const KNOWN_MODELS: &[&str] = &["kokoro", "tts-1", "tts-1-hd"];

pub struct AppState {
    pub tts: TtsService,
    pub api_key: Option<String>,
    /// Unix seconds, reported as `created` in the model list.
    pub started_at: u64,
}

impl AppState {
    pub fn new(tts: TtsService, api_key: Option<String>) -> Self {
        let started_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            tts,
            api_key: api_key.filter(|key| !key.is_empty()),
            started_at,
        }
    }
}

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.api_key.as_deref() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        if presented != Some(expected) {
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let openai_routes = Router::new()
        .route("/models", get(handlers::list_models))
        .route("/voices", get(handlers::list_voices))
        .route("/audio/speech", post(handlers::create_speech))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key,
        ));

    Router::new()
        .nest("/v1", openai_routes)
        .route("/health", get(handlers::health))
        .route("/generate", post(handlers::generate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
