//! Command-line interface: argument parsing and command dispatch.

mod batch;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use cachesim::replay::DEFAULT_SNAPSHOT_INTERVAL;
use cachesim::EvictionPolicy;

/// Offline trace-driven response cache simulator.
#[derive(Debug, Parser)]
#[command(name = "cachesim", version, about)]
pub(crate) struct Cli {
    /// Input trace file (`ID;timestamp;query`, one header line).
    #[arg(short, long, default_value = "test_requests.csv")]
    pub file: PathBuf,

    /// Cache size in items.
    #[arg(short = 's', long = "size", default_value_t = 10)]
    pub size: i64,

    /// Time to live in seconds.
    #[arg(short = 't', long = "ttl", default_value_t = 60)]
    pub ttl: i64,

    /// Eviction policy.
    #[arg(long, default_value = "lru")]
    pub policy: EvictionPolicy,

    /// Stop after processing this many requests.
    #[arg(long)]
    pub limit: Option<u64>,

    /// Sweep the default (size, TTL) grid instead of a single run.
    #[arg(long)]
    pub batch: bool,

    /// Processed requests between statistics snapshots.
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_INTERVAL)]
    pub snapshot_interval: u64,

    /// Final summary output format.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SummaryFormat {
    Text,
    Json,
}

pub(crate) fn dispatch(cli: Cli) -> Result<()> {
    if cli.batch {
        batch::cmd_batch(&cli)
    } else {
        run::cmd_run(&cli)
    }
}
