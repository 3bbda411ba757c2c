//! Pre-earnings options screener CLI.
//!
//! Reads a JSON market snapshot (daily bars, expiration dates, option chains
//! and the spot price) and prints the screening verdict.
//!
//! ```bash
//! earnings-screener --input snapshot.json
//! earnings-screener --input snapshot.json --json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use earnings_screener::{MarketSnapshot, Screener};

/// Screen an option market for a pre-earnings volatility premium.
#[derive(Parser)]
#[command(name = "earnings-screener")]
#[command(about = "Screen an option market for a pre-earnings volatility premium")]
#[command(version)]
struct Cli {
    /// Path to a JSON market snapshot
    #[arg(short, long)]
    input: PathBuf,

    /// Emit the full report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("earnings_screener=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let snapshot: MarketSnapshot =
        serde_json::from_str(&raw).context("parsing market snapshot")?;

    let report = Screener::analyze(&snapshot)
        .with_context(|| format!("screening {}", snapshot.ticker))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }

    Ok(())
}
