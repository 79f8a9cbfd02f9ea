//! OpenAI-compatible speech client.
//!
//! Points at any server exposing `/v1/audio/speech` and `/v1/models`
//! (a local Kokoro server by default). Every call is a single request:
//! no retries, and no timeout unless one is configured.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, Response};

use crate::api::{ErrorResponse, ModelList, SpeechRequest, VoiceList};
use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the `/v1` segment.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Audio returned by a successful synthesis call.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl SpeechAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        tokio::fs::write(path.as_ref(), &self.bytes).await?;
        Ok(())
    }
}

pub struct SpeechClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SpeechClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// `POST /audio/speech`. A non-2xx answer (e.g. empty `input`) is an error.
    pub async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechAudio, ClientError> {
        let url = self.url("audio/speech");
        tracing::debug!(
            url = %url,
            model = %request.model,
            voice = %request.voice,
            format = %request.response_format,
            text_len = request.input.len(),
            "Sending speech request"
        );

        let response = self
            .authorize(self.client.post(&url))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        tracing::info!(
            content_type = ?content_type,
            audio_size = bytes.len(),
            "Speech received"
        );

        Ok(SpeechAudio {
            bytes,
            content_type,
        })
    }

    pub async fn list_models(&self) -> Result<ModelList, ClientError> {
        self.get_json("models").await
    }

    pub async fn list_voices(&self) -> Result<VoiceList, ClientError> {
        self.get_json("voices").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turns a non-2xx response into [`ClientError::Api`], preferring the
/// server's OpenAI-style error message over the raw body.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body,
    };

    tracing::warn!(status = %status, message = %message, "Request failed");
    Err(ClientError::Api { status, message })
}
