use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "verity", about = "Check content for AI generation with the Verity API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze text given inline or read from a file
    Text {
        /// Text to analyze
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the text from this file instead
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Analyze an image file
    Image {
        /// Path to the image
        path: PathBuf,
    },
    /// Analyze a video file
    Video {
        /// Path to the video
        path: PathBuf,
    },
    /// Analyze an audio file (demo result)
    Audio {
        /// Path to the audio file
        path: PathBuf,
    },
    /// List recent detections, newest first
    History {
        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: i64,
    },
}

/// Pretty JSON for terminal output.
pub fn render_json(value: &impl Serialize) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Serialize response")
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}
