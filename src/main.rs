//! Ingredient shuffle binary
//!
//! Run with: `ingredient-shuffle --records records.json --settings settings.json`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ingredient_shuffle::flush::flush_to_jsonl;
use ingredient_shuffle::{MemoryHost, RandType, ShuffleConfig, run};

#[derive(Parser)]
#[command(name = "ingredient-shuffle")]
#[command(about = "Redistribute magic effects across ingredient records")]
#[command(version)]
struct Cli {
    /// Record set to shuffle (JSON, versions in load order)
    #[arg(short, long)]
    records: PathBuf,

    /// Settings file (JSON); defaults apply when omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the randomization type from the settings file
    #[arg(short, long, value_parser = parse_rand_type)]
    mode: Option<RandType>,

    /// Override the RNG seed from the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Source name recorded on patched record versions
    #[arg(long, default_value = MemoryHost::DEFAULT_PATCH_SOURCE)]
    patch_name: String,

    /// Directory for the change log and patched records
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_rand_type(s: &str) -> Result<RandType, String> {
    RandType::try_from(s.to_string())
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

    let mut config = match &cli.settings {
        Some(path) => ShuffleConfig::from_json_file(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => ShuffleConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.rand_type = Some(mode.into());
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let log_visible = config.log_visible;

    let mut host = MemoryHost::from_json_file(&cli.records)
        .with_context(|| format!("Failed to load records from {}", cli.records.display()))?
        .with_patch_source(cli.patch_name);
    info!(
        path = %cli.records.display(),
        patch = host.patch_source(),
        "loaded records"
    );

    let summary = run(&mut host, config, Some(cli.out_dir.as_path())).context("Shuffle failed")?;
    flush_to_jsonl(&host, &summary.log, &cli.out_dir)
        .with_context(|| format!("Failed to write results to {}", cli.out_dir.display()))?;

    if log_visible {
        println!("{}", summary.log.render());
    }
    println!(
        "Patched {} records ({}, seed {})",
        summary.patched, summary.rand_type, summary.seed
    );
    Ok(())
}
