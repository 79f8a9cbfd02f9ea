use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kokoro_openai::smoke::{self, SmokeTester};

/// Checks that an OpenAI-compatible speech server answers on
/// `/health`, `/v1/models` and `/v1/audio/speech`.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[arg(default_value = smoke::DEFAULT_BASE_URL)]
    base_url: String,
    api_key: Option<String>,
    /// Directory receiving `test_output.wav`
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn print_probe(out: &mut impl Write, heading: &str, outcome: &smoke::ProbeOutcome) -> std::io::Result<()> {
    writeln!(out, "\n{}", heading)?;
    let mark = if outcome.passed { "✓" } else { "✗" };
    for (i, line) in outcome.details.iter().enumerate() {
        if i == 0 {
            writeln!(out, "{} {}", mark, line)?;
        } else {
            writeln!(out, "  {}", line)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    kokoro_openai::init_tracing("warn");
    let cli = Cli::parse();

    let tester = SmokeTester::new(cli.base_url, cli.api_key.clone()).with_output_dir(cli.output_dir);
    let mut out = std::io::stdout();

    let rule = "=".repeat(60);
    writeln!(out, "{}", rule)?;
    writeln!(out, "  Kokoro TTS - OpenAI API Endpoint Test")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Base URL: {}", tester.base_url())?;
    match cli.api_key.as_deref().filter(|key| !key.is_empty()) {
        Some(key) => writeln!(out, "API Key: {}", smoke::mask_key(key))?,
        None => writeln!(out, "API Key: Not provided")?,
    }

    let health = tester.check_health().await;
    print_probe(&mut out, &format!("Testing health endpoint: {}/health", tester.base_url()), &health)?;

    let models = tester.check_models().await;
    print_probe(&mut out, &format!("Testing models endpoint: {}/v1/models", tester.base_url()), &models)?;

    writeln!(
        out,
        "\nRequest payload: {}",
        serde_json::to_string_pretty(&smoke::probe_request())?
    )?;
    let speech = tester.check_speech().await;
    print_probe(
        &mut out,
        &format!("Testing OpenAI endpoint: {}/v1/audio/speech", tester.base_url()),
        &speech,
    )?;

    let report = smoke::SmokeReport {
        outcomes: vec![health, models, speech],
    };
    report.render(&mut out)?;

    Ok(ExitCode::from(report.exit_code() as u8))
}
