//! Reading-order reconstruction from recognizer JSON.
//!
//! Reads a recognizer payload (aggregate `rec_texts`/`rec_scores`/`rec_boxes`
//! or a legacy page list) from a file or stdin and prints the reconstruction
//! response as JSON. Exits with status 1 when reconstruction fails.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example reconstruct -- result.json --pretty
//! ```
//!
//! Reading from stdin with a config file and a wider line threshold:
//!
//! ```bash
//! cat result.json | cargo run --example reconstruct -- \
//!     --config reading_order.toml \
//!     --y-threshold 14 \
//!     --report-skipped
//! ```

use clap::Parser;
use oar_reading_order::core::init_tracing;
use oar_reading_order::pipeline::{
    ConfigLoader, MalformedPolicy, ReadingOrderConfig, ReadingOrderPipeline,
    ReconstructionResponse,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for the reconstruction example.
#[derive(Parser)]
#[command(name = "reconstruct")]
#[command(about = "Reconstruct reading order from text recognizer output")]
struct Args {
    /// Recognizer JSON file. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Configuration file (`.toml` or `.json`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Line-grouping threshold in pixels, overriding the configuration.
    #[arg(long)]
    y_threshold: Option<f32>,

    /// Report skipped detections in the response.
    #[arg(long)]
    report_skipped: bool,

    /// Pretty-print the response.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigLoader::load_from_file(path)?
        }
        None => ReadingOrderConfig::default(),
    };
    if let Some(threshold) = args.y_threshold {
        config = config.with_y_threshold(threshold);
    }
    if args.report_skipped {
        config = config.with_malformed_policy(MalformedPolicy::Report);
    }

    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let response = if input.trim().is_empty() {
        ReconstructionResponse::failure("No input data received")
    } else {
        ReadingOrderPipeline::new(config)?.reconstruct_json(&input)
    };

    println!("{}", response.to_json(args.pretty));

    if !response.success {
        error!(
            "Reconstruction failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    info!(
        "Reconstructed {} fragments into {} lines",
        response.data().len(),
        response.text().lines().count()
    );
    Ok(())
}
