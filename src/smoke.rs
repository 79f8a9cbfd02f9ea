//! Pass/fail probes against a running speech server.
//!
//! Three independent checks (`/health`, `/v1/models`, `/v1/audio/speech`)
//! issued as raw HTTP calls; one failing never stops the others.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{header, Client};

use crate::api::{HealthStatus, ModelList, ResponseFormat, SpeechRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const SPEECH_TIMEOUT: Duration = Duration::from_secs(30);
pub const OUTPUT_FILE: &str = "test_output.wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Health,
    Models,
    Speech,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Probe::Health => "health",
            Probe::Models => "models",
            Probe::Speech => "speech",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub probe: Probe,
    pub passed: bool,
    /// Human-readable findings, one per line.
    pub details: Vec<String>,
}

impl ProbeOutcome {
    fn pass(probe: Probe, details: Vec<String>) -> Self {
        Self {
            probe,
            passed: true,
            details,
        }
    }

    fn fail(probe: Probe, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(probe = %probe, reason = %reason, "Probe failed");
        Self {
            probe,
            passed: false,
            details: vec![reason],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmokeReport {
    pub outcomes: Vec<ProbeOutcome>,
}

impl SmokeReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(60);
        writeln!(out, "\n{}", rule)?;
        writeln!(out, "  Test Results")?;
        writeln!(out, "{}", rule)?;
        for outcome in &self.outcomes {
            let status = if outcome.passed { "✓ PASSED" } else { "✗ FAILED" };
            writeln!(out, "{:<20}: {}", outcome.probe.to_string(), status)?;
        }
        writeln!(out, "{}", rule)?;

        if self.all_passed() {
            writeln!(out, "\nAll tests passed!")
        } else {
            writeln!(out, "\nSome tests failed. Please check the server is running.")
        }
    }
}

/// Replaces every character of a secret with `*`.
pub fn mask_key(key: &str) -> String {
    "*".repeat(key.chars().count())
}

/// The fixed synthesis request used by the speech probe.
pub fn probe_request() -> SpeechRequest {
    SpeechRequest::new(
        "kokoro",
        "af_heart",
        "This is a test of the OpenAI-compatible API endpoint.",
    )
    .with_format(ResponseFormat::Wav)
    .with_speed(1.0)
    .with_language("a")
}

pub struct SmokeTester {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    output_dir: PathBuf,
}

impl SmokeTester {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE)
    }

    /// Runs every probe in order: health, models, speech.
    pub async fn run(&self) -> SmokeReport {
        let outcomes = vec![
            self.check_health().await,
            self.check_models().await,
            self.check_speech().await,
        ];
        SmokeReport { outcomes }
    }

    pub async fn check_health(&self) -> ProbeOutcome {
        let url = format!("{}/health", self.base_url);
        tracing::debug!(url = %url, "Probing health");

        let response = match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::fail(Probe::Health, format!("Failed to connect: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::fail(Probe::Health, format!("Health check failed: {}", status));
        }

        match response.json::<HealthStatus>().await {
            Ok(health) => {
                let device = if health.device_info.is_empty() {
                    "Unknown".to_string()
                } else {
                    health.device_info
                };
                ProbeOutcome::pass(
                    Probe::Health,
                    vec![
                        format!("Status: {}", health.status),
                        format!("Device: {}", device),
                        format!("Available voices: {}", health.available_voices.len()),
                    ],
                )
            }
            Err(e) => ProbeOutcome::fail(Probe::Health, format!("Invalid health body: {}", e)),
        }
    }

    pub async fn check_models(&self) -> ProbeOutcome {
        let url = format!("{}/v1/models", self.base_url);
        tracing::debug!(url = %url, "Probing models");

        let mut request = self.client.get(&url).timeout(PROBE_TIMEOUT);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::fail(Probe::Models, format!("Failed to connect: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::fail(Probe::Models, format!("Request failed: {}", status));
        }

        match response.json::<ModelList>().await {
            Ok(models) => {
                let mut details = vec![format!("Available models: {}", models.data.len())];
                details.extend(models.data.iter().map(|model| format!("  - {}", model.id)));
                ProbeOutcome::pass(Probe::Models, details)
            }
            Err(e) => ProbeOutcome::fail(Probe::Models, format!("Invalid models body: {}", e)),
        }
    }

    pub async fn check_speech(&self) -> ProbeOutcome {
        let url = format!("{}/v1/audio/speech", self.base_url);
        let payload = probe_request();
        tracing::debug!(url = %url, "Probing speech synthesis");

        let mut request = self
            .client
            .post(&url)
            .timeout(SPEECH_TIMEOUT)
            .json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::fail(Probe::Speech, format!("Error: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return ProbeOutcome::fail(
                Probe::Speech,
                format!("Request failed: {} - {}", status, body),
            );
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let audio = match response.bytes().await {
            Ok(audio) => audio,
            Err(e) => return ProbeOutcome::fail(Probe::Speech, format!("Error reading audio: {}", e)),
        };

        let path = self.output_path();
        if let Err(e) = tokio::fs::write(&path, &audio).await {
            return ProbeOutcome::fail(
                Probe::Speech,
                format!("Failed to save {}: {}", path.display(), e),
            );
        }

        ProbeOutcome::pass(
            Probe::Speech,
            vec![
                format!("Content type: {}", content_type),
                format!("Content length: {} bytes", audio.len()),
                format!("Saved to: {}", path.display()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(probe: Probe, passed: bool) -> ProbeOutcome {
        ProbeOutcome {
            probe,
            passed,
            details: Vec::new(),
        }
    }

    #[test]
    fn exit_code_is_and_of_probes() {
        let mut report = SmokeReport {
            outcomes: vec![
                outcome(Probe::Health, true),
                outcome(Probe::Models, true),
                outcome(Probe::Speech, true),
            ],
        };
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);

        report.outcomes[1].passed = false;
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn render_lists_each_probe() {
        let report = SmokeReport {
            outcomes: vec![outcome(Probe::Health, true), outcome(Probe::Speech, false)],
        };
        let mut out = Vec::new();
        report.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("health              : ✓ PASSED"));
        assert!(text.contains("speech              : ✗ FAILED"));
        assert!(text.contains("Some tests failed"));
    }

    #[test]
    fn probe_payload_matches_contract() {
        let value = serde_json::to_value(probe_request()).unwrap();
        assert_eq!(value["model"], "kokoro");
        assert_eq!(value["voice"], "af_heart");
        assert_eq!(value["response_format"], "wav");
        assert_eq!(value["speed"], 1.0);
        assert_eq!(value["language"], "a");
    }

    #[test]
    fn keys_are_masked() {
        assert_eq!(mask_key("secret"), "******");
        assert_eq!(mask_key(""), "");
    }

    #[test]
    fn empty_key_is_no_key() {
        let tester = SmokeTester::new("http://localhost:8000/", Some(String::new()));
        assert!(tester.api_key.is_none());
        assert_eq!(tester.base_url(), "http://localhost:8000");
        assert_eq!(tester.output_path(), PathBuf::from("./test_output.wav"));
    }
}
