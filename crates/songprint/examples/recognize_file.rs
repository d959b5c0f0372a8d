//! Fingerprint an audio file and print the JSON body a client would upload.
//!
//! Run with: cargo run -p songprint --example recognize_file -- path/to/song.mp3
//!
//! Settings come from the user config file when one exists. Set `RUST_LOG=debug`
//! to see per-stage timings.

use std::path::PathBuf;
use std::process::ExitCode;

use songprint::{Recognizer, RecognizerConfig, SignatureEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: recognize_file <audio-file>");
        return ExitCode::FAILURE;
    };

    let config = match RecognizerConfig::load_or_default() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config: {err}");
            return ExitCode::FAILURE;
        }
    };

    let engine = SignatureEngine::from_config(&config);
    tracing::info!(path = %path.display(), workers = engine.workers(), "recognizing");

    match engine.recognize_path(&path).await.and_then(|s| s.to_json()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
