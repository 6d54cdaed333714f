use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Prioritize the queued requests of a quota scheduler pool.
///
/// Reads a pool snapshot (account configs, balances, queued requests and
/// workers) and prints the requests in dispatch order, grouped by priority.
#[derive(Parser, Debug)]
#[command(
    name = "qscheduler-prioritize",
    about = "Prioritize the queued requests of a quota scheduler pool"
)]
pub struct CliArgs {
    /// Pool snapshot to load (.json for JSON, anything else for TOML)
    #[arg(long, env = "QSCHEDULER_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Output format
    #[arg(long, env = "QSCHEDULER_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print the requests at this priority (free bucket is 3)
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
