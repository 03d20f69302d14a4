//! voxsplit - entry point
//!
//! CLI wrapper around the split pipeline: parses arguments, initializes
//! logging, and runs discovery, planning, and the optional symlink-tree
//! materialization.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use voxsplit::config::SplitConfig;

/// Command-line arguments for voxsplit
#[derive(Parser, Debug)]
#[command(name = "voxsplit")]
#[command(about = "Speaker-dependent dataset split planner")]
#[command(version)]
struct Args {
    /// Directory containing the audio data and sidecar metadata
    data_dir: PathBuf,

    /// Output directory for the metadata cache and the split tree
    out_dir: PathBuf,

    /// Rebuild the metadata list instead of trusting the cache
    #[arg(long)]
    ignore_cache: bool,

    /// Path to the reference corpus split table
    #[arg(long, default_value = "speakers.json", env = "VOXSPLIT_REFERENCE")]
    reference: PathBuf,

    /// Hours of audio reserved per speaker for the validation bucket
    #[arg(long, default_value_t = 1.0)]
    val_hours: f64,

    /// Hours of audio reserved per speaker for the test bucket
    #[arg(long, default_value_t = 1.0)]
    test_hours: f64,

    /// Audio file extension, without the leading dot
    #[arg(long, default_value = "flac")]
    audio_extension: String,

    /// Metadata file extension, without the leading dot
    #[arg(long, default_value = "json")]
    metadata_extension: String,

    /// Materialize the symlink tree under the output directory
    #[arg(long)]
    materialize: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting voxsplit v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", args.data_dir.display());
    info!("Output directory: {}", args.out_dir.display());

    let config = SplitConfig {
        audio_extension: args.audio_extension,
        metadata_extension: args.metadata_extension,
        val_hours: args.val_hours,
        test_hours: args.test_hours,
        reference_table: args.reference,
    };

    let outcome = voxsplit::run(
        &config,
        &args.data_dir,
        &args.out_dir,
        args.ignore_cache,
        args.materialize,
    )
    .context("split planning failed")?;

    info!(
        "done: {} records across {} speakers",
        outcome.records, outcome.speakers
    );

    Ok(())
}
