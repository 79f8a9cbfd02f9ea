use std::sync::Arc;

use kokoro_openai::api::routes::{create_router, AppState};
use kokoro_openai::config::ServerConfig;
use kokoro_openai::tts::TtsService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    kokoro_openai::init_tracing("info");

    // Configuration from environment
    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    tracing::info!("Kokoro mock server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!(
        "API key: {}",
        if config.api_key.is_some() { "required" } else { "not required" }
    );

    let tts = TtsService::new(config.sample_rate);
    let state = Arc::new(AppState::new(tts, config.api_key));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
