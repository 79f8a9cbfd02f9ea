use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kokoro_openai::client::{ClientConfig, SpeechClient, DEFAULT_BASE_URL};
use kokoro_openai::demo::Demo;

/// Walks through the OpenAI-compatible speech API of a local Kokoro server.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[arg(long, env = "KOKORO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Local servers ignore the key; remote ones may require it
    #[arg(long, env = "KOKORO_API_KEY", default_value = "not-needed")]
    api_key: String,
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Play the generated files when done
    #[cfg(feature = "audio-playback")]
    #[arg(long)]
    play: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    kokoro_openai::init_tracing("warn");
    let cli = Cli::parse();
    let mut out = std::io::stdout();

    let rule = "=".repeat(60);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "  Kokoro TTS - OpenAI Client Examples")?;
    writeln!(out, "{}", rule)?;

    let client = SpeechClient::new(ClientConfig::new(&cli.base_url).with_api_key(cli.api_key))?;
    let demo = Demo::new(client, cli.output_dir);

    match demo.run(&mut out).await {
        Ok(summary) => {
            writeln!(out, "\nYou can now play these files to hear the results.")?;

            #[cfg(feature = "audio-playback")]
            if cli.play {
                for file in &summary.files {
                    if let Err(e) = kokoro_openai::playback::play_file(file) {
                        tracing::error!("Failed to play {}: {}", file.display(), e);
                    }
                }
            }
            #[cfg(not(feature = "audio-playback"))]
            let _ = summary;

            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            writeln!(out, "\n{}", rule)?;
            writeln!(out, "✗ Error running examples: {}", e)?;
            writeln!(out, "{}", rule)?;
            writeln!(out, "\nMake sure the Kokoro TTS server is running at {}", cli.base_url)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
