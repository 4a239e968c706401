//! Single-run command handler.

use anyhow::{Context, Result};
use tracing::info;

use cachesim::report::{ProgressLogger, StatsCsvWriter};
use cachesim::{CsvTraceReader, ReplayObserver, RunSummary, SimConfig, TraceReplayer};

use super::{Cli, SummaryFormat};

/// Run one simulation and print its summary.
pub(crate) fn cmd_run(cli: &Cli) -> Result<()> {
    let config = SimConfig::new(cli.size, cli.ttl, cli.policy);
    let summary = replay_one(cli, &config)?;

    match cli.format {
        SummaryFormat::Text => {
            println!("Cached requests: {}", summary.final_resident_count);
            println!("Total requests : {}", summary.total_requests);
            println!("Total hits     : {}", summary.hits);
            println!("Total misses   : {}", summary.misses);
            println!("Hit ratio      : {:.4}", summary.hit_ratio());
        }
        SummaryFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

/// Replay the trace once under `config`, writing the per-run statistics
/// file and logging progress. Used by both single-run and batch modes.
pub(crate) fn replay_one(cli: &Cli, config: &SimConfig) -> Result<RunSummary> {
    info!("Initialising cache");
    info!(" - Max size [req]: {}", config.capacity);
    info!(" - Strategy      : {}", config.policy);
    info!(" - TTL [Sec]     : {}", config.ttl_secs);

    let engine = config
        .build_engine()
        .context("Invalid cache configuration")?;

    let mut source = CsvTraceReader::open_counted(&cli.file)
        .with_context(|| format!("Failed to open trace file {}", cli.file.display()))?;

    let stats_path = config.stats_file_name();
    let stats = StatsCsvWriter::create(&stats_path)
        .with_context(|| format!("Failed to create statistics file {stats_path}"))?;
    let mut observers: Vec<Box<dyn ReplayObserver>> =
        vec![Box::new(ProgressLogger), Box::new(stats)];

    match cli.limit {
        Some(limit) => info!(
            "Replaying {} requests from file {}",
            limit,
            cli.file.display()
        ),
        None => info!("Replaying all requests from file {}", cli.file.display()),
    }

    let mut replayer =
        TraceReplayer::new(engine).with_snapshot_interval(cli.snapshot_interval);
    let summary = replayer
        .replay(&mut source, &mut observers, cli.limit)
        .with_context(|| format!("Replay of {} failed", cli.file.display()))?;

    info!("Finished");
    info!(" - Cached requests: {}", summary.final_resident_count);
    info!(" - Total requests : {}", summary.total_requests);
    info!(" - Total hits     : {}", summary.hits);
    info!(" - Total misses   : {}", summary.misses);
    Ok(summary)
}
