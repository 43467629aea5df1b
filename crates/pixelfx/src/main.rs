//! pixelfx CLI - apply parameterized visual effects to an image.
//!
//! ```bash
//! # Apply a chain of effects, in order
//! pixelfx apply photo.jpg out.png --effects '[{"id":"blur","params":{"radius":3}}]'
//!
//! # Fast low-fidelity render for interactive feedback
//! pixelfx apply photo.jpg preview.jpg --effects effects.json --preview
//!
//! # Show every available effect and its parameters
//! pixelfx list-effects
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixelfx_core::pipeline::{EffectRequest, Pipeline};
use pixelfx_core::{codec, list_effects};

#[derive(Parser, Debug)]
#[command(name = "pixelfx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply an ordered list of effects to an image
    Apply(ApplyArgs),

    /// Print available effects and their parameters as JSON
    ListEffects,
}

#[derive(clap::Args, Debug)]
struct ApplyArgs {
    /// Input image (format inferred from contents)
    input: PathBuf,

    /// Output image (format inferred from extension)
    output: PathBuf,

    /// Effect list: inline JSON array or a path to a JSON file.
    /// Each entry is {"id": "...", "params": {"name": value, ...}}.
    #[arg(short, long, default_value = "[]")]
    effects: String,

    /// Render at preview quality (longest edge capped at 800px)
    #[arg(short, long)]
    preview: bool,
}

fn parse_effects(arg: &str) -> Result<Vec<EffectRequest>> {
    let json = if arg.trim_start().starts_with('[') {
        arg.to_owned()
    } else {
        fs::read_to_string(arg).with_context(|| format!("failed to read effect file {arg}"))?
    };
    serde_json::from_str(&json).context("malformed effect list")
}

fn run_apply(args: &ApplyArgs) -> Result<()> {
    let requests = parse_effects(&args.effects)?;
    let input = codec::load(&args.input)?;
    info!(
        width = input.width,
        height = input.height,
        effects = requests.len(),
        preview = args.preview,
        "processing"
    );

    let pipeline = Pipeline::new();
    let output = pipeline.apply(input, &requests, args.preview)?;
    codec::save(&output, &args.output)?;
    info!(path = %args.output.display(), "wrote result");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Apply(args) => run_apply(args),
        Commands::ListEffects => {
            let json = serde_json::to_string_pretty(&list_effects())?;
            println!("{json}");
            Ok(())
        }
    }
}
