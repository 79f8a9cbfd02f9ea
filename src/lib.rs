//! Client, smoke tester and mock server for OpenAI-compatible speech APIs
//! (`/health`, `/v1/models`, `/v1/audio/speech`), targeting local Kokoro
//! deployments.

pub mod api;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
#[cfg(feature = "audio-playback")]
pub mod playback;
pub mod smoke;
pub mod tts;

use tracing_subscriber::EnvFilter;

pub use api::{ResponseFormat, SpeechRequest};
pub use client::{ClientConfig, SpeechClient};
pub use error::{AppError, ClientError, ErrorCategory};

/// Installs the fmt subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}
