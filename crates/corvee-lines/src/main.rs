#![doc = include_str!("../README.md")]

mod clean;
mod config;
mod pipeline;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, PipelineConfig};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = PipelineConfig::try_from(args)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let lines = read_lines(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    tracing::info!("loaded {} lines from {}", lines.len(), config.input.display());

    let records = if config.raw {
        lines
    } else {
        extract_utterances(lines)
    };

    let (cleaned, summary) = pipeline::clean_lines(records, config.workers)?;
    tracing::info!(
        "cleaned {} lines ({} failed, {} discarded)",
        summary.executed,
        summary.failed,
        summary.discarded
    );

    write_lines(config.output.as_deref(), &cleaned)?;
    Ok(())
}

/// Pulls the spoken-text field out of each corpus record, dropping records
/// that do not carry all five fields.
fn extract_utterances(lines: Vec<String>) -> Vec<String> {
    let total = lines.len();
    let utterances: Vec<String> = lines
        .iter()
        .filter_map(|line| clean::utterance(line))
        .map(str::to_owned)
        .collect();

    let skipped = total - utterances.len();
    if skipped > 0 {
        tracing::warn!("skipped {skipped} malformed corpus lines");
    }

    utterances
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

fn write_lines(path: Option<&Path>, lines: &[String]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            for line in lines {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
            tracing::info!("wrote {} lines to {}", lines.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
