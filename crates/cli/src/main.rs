mod cli;
mod render;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use qscheduler_core::{Priority, Snapshot};
use qscheduler_priority::prioritize_requests;

use crate::cli::{CliArgs, OutputFormat};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    debug!(?args, "parsed arguments");

    let snapshot = Snapshot::from_file(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;

    let ordered = prioritize_requests(&snapshot.state, &snapshot.config);
    info!(
        requests = ordered.len(),
        bands = ordered.band_counts().len(),
        "prioritized snapshot"
    );

    let only = args.priority.map(Priority::new);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => render::write_text(&mut out, &render::select_bands(&ordered, only)),
        OutputFormat::Json => render::write_json(&mut out, &ordered, only),
    }
    .context("failed to write output")?;
    out.flush().context("failed to write output")?;

    Ok(())
}
