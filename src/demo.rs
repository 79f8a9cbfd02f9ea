//! Walkthrough of the client against a local speech server.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::{ResponseFormat, SpeechRequest};
use crate::client::SpeechClient;
use crate::error::{ClientError, ErrorCategory};

pub const BASIC_OUTPUT: &str = "example_basic.wav";
pub const FAST_OUTPUT: &str = "example_fast.wav";

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// What the empty-input step observed.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedFailure {
    Caught {
        category: ErrorCategory,
        message: String,
    },
    /// The server accepted an empty input.
    NotRaised,
}

#[derive(Debug, Clone)]
pub struct DemoSummary {
    pub files: Vec<PathBuf>,
    /// Model ids, or `None` when listing failed (tolerated).
    pub models: Option<Vec<String>>,
    pub expected_failure: ExpectedFailure,
}

pub struct Demo {
    client: SpeechClient,
    output_dir: PathBuf,
}

fn banner<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", rule)
}

impl Demo {
    pub fn new(client: SpeechClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    /// Runs every example in order. Only the two synthesis examples can
    /// abort the run.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<DemoSummary, DemoError> {
        let basic = self.basic_usage(out).await?;
        let fast = self.with_options(out).await?;
        self.provider_switch(out)?;
        let models = self.list_models(out).await?;
        let expected_failure = self.error_handling(out).await?;

        banner(out, "✓ All examples completed!")?;
        writeln!(out, "\nGenerated audio files:")?;
        writeln!(out, "  - {} (basic speech)", basic.display())?;
        writeln!(out, "  - {} (1.3x speed)", fast.display())?;

        Ok(DemoSummary {
            files: vec![basic, fast],
            models,
            expected_failure,
        })
    }

    async fn synthesize_to<W: Write>(
        &self,
        out: &mut W,
        step: &'static str,
        request: &SpeechRequest,
        file_name: &str,
    ) -> Result<PathBuf, DemoError> {
        let audio = self
            .client
            .create_speech(request)
            .await
            .map_err(|source| DemoError::Step { step, source })?;

        let path = self.output_dir.join(file_name);
        audio
            .save(&path)
            .await
            .map_err(|source| DemoError::Step { step, source })?;

        writeln!(out, "✓ Speech saved to: {}", path.display())?;
        Ok(path)
    }

    pub async fn basic_usage<W: Write>(&self, out: &mut W) -> Result<PathBuf, DemoError> {
        banner(out, "Example 1: Basic Speech Generation")?;
        writeln!(out, "Generating speech...")?;

        let request = SpeechRequest::new(
            "kokoro",
            "af_heart",
            "Hello! This is an example of using Kokoro TTS with an OpenAI-compatible client.",
        )
        .with_format(ResponseFormat::Wav);

        self.synthesize_to(out, "basic speech generation", &request, BASIC_OUTPUT)
            .await
    }

    pub async fn with_options<W: Write>(&self, out: &mut W) -> Result<PathBuf, DemoError> {
        banner(out, "Example 2: Speech Generation with Options")?;
        writeln!(out, "Generating speech with speed 1.3x...")?;

        let request = SpeechRequest::new(
            "kokoro",
            "am_adam",
            "This speech is generated at 1.3x speed for faster playback.",
        )
        .with_format(ResponseFormat::Wav)
        .with_speed(1.3);

        self.synthesize_to(out, "speech generation with options", &request, FAST_OUTPUT)
            .await
    }

    /// Prints how to point the same client at another compatible server.
    pub fn provider_switch<W: Write>(&self, out: &mut W) -> Result<(), DemoError> {
        banner(out, "Example 3: Using another OpenAI-compatible server")?;
        writeln!(out, "Only the client configuration changes:")?;
        writeln!(
            out,
            r#"
    let client = SpeechClient::new(
        ClientConfig::new("http://your-vibevoice-server:8000/v1")
            .with_api_key("your-api-key-here"),
    )?;

    let audio = client
        .create_speech(
            &SpeechRequest::new("vibevoice/VibeVoice-1.5B", "Andrew", "Hello from VibeVoice!")
                .with_format(ResponseFormat::Mp3),
        )
        .await?;
"#
        )?;
        Ok(())
    }

    pub async fn list_models<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<Option<Vec<String>>, DemoError> {
        banner(out, "Example 4: Listing Available Models")?;
        writeln!(out, "Fetching available models...")?;

        match self.client.list_models().await {
            Ok(models) => {
                writeln!(out, "\nAvailable models:")?;
                for model in &models.data {
                    writeln!(out, "  - {}", model.id)?;
                    writeln!(out, "    Owner: {}", model.owned_by)?;
                    writeln!(out, "    Created: {}", model.created)?;
                }
                Ok(Some(models.data.into_iter().map(|m| m.id).collect()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model listing failed");
                writeln!(out, "Note: Model listing may not be fully supported. Error: {}", e)?;
                Ok(None)
            }
        }
    }

    pub async fn error_handling<W: Write>(&self, out: &mut W) -> Result<ExpectedFailure, DemoError> {
        banner(out, "Example 5: Error Handling")?;
        writeln!(out, "Attempting to generate speech with empty input...")?;

        let request =
            SpeechRequest::new("kokoro", "af_heart", "").with_format(ResponseFormat::Wav);

        match self.client.create_speech(&request).await {
            Ok(_) => {
                writeln!(out, "✗ Server accepted empty input")?;
                Ok(ExpectedFailure::NotRaised)
            }
            Err(e) => {
                let message: String = e.to_string().chars().take(100).collect();
                writeln!(out, "✓ Expected error caught: {}", e.category())?;
                writeln!(out, "  Message: {}...", message)?;
                Ok(ExpectedFailure::Caught {
                    category: e.category(),
                    message,
                })
            }
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    #[test]
    fn provider_switch_only_prints() {
        let client = SpeechClient::new(ClientConfig::default()).unwrap();
        let demo = Demo::new(client, "out");
        let mut out = Vec::new();
        demo.provider_switch(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Example 3"));
        assert!(text.contains("your-api-key-here"));
        assert_eq!(demo.output_dir(), Path::new("out"));
    }
}
