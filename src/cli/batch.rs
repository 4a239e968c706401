//! Batch sweep command handler.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use cachesim::report::BatchCsvWriter;
use cachesim::BatchPlan;

use super::run::replay_one;
use super::Cli;

const BATCH_RESULT_FILE: &str = "batch_result.csv";

/// Replay the trace under every configuration of the default sweep grid,
/// recording one summary row per configuration.
pub(crate) fn cmd_batch(cli: &Cli) -> Result<()> {
    let plan = BatchPlan::default();
    info!("Running batch simulation on {}...", cli.file.display());

    let mut results = BatchCsvWriter::create(Path::new(BATCH_RESULT_FILE))
        .with_context(|| format!("Failed to create {BATCH_RESULT_FILE}"))?;

    for config in plan.configs() {
        info!("Running simulation...");
        let summary = replay_one(cli, &config)?;
        results
            .append(&config, &summary, &cli.file)
            .with_context(|| {
                format!(
                    "Failed to record batch result for size {} ttl {}",
                    config.capacity, config.ttl_secs
                )
            })?;
    }

    info!("Finished");
    println!("Batch results written to {BATCH_RESULT_FILE}");
    Ok(())
}
