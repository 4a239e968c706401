//! Per-run statistics file writing.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::replay::{ReplayObserver, RunSummary, Snapshot};

/// Fixed-width variant of the trace timestamp format; `%.3f` always prints
/// the millisecond field, so rows stay uniform.
const STATS_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Writes one semicolon-delimited row per snapshot to a statistics file
/// (conventionally `S_{size}_T_{ttl}_{policy}.csv`, see
/// [`SimConfig::stats_file_name`](crate::config::SimConfig::stats_file_name)).
///
/// Rows are flushed as they are written so a partial file is readable while
/// a long replay is still running.
pub struct StatsCsvWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl StatsCsvWriter {
    /// Create (truncate) the statistics file and write its header line.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .map_err(into_io)?;
        writer
            .write_record([
                "Timestamp",
                "cache size",
                "hits count",
                "miss count",
                "requests",
                "total requests",
            ])
            .map_err(into_io)?;
        writer.flush()?;
        Ok(Self { writer, path })
    }

    /// Path of the statistics file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReplayObserver for StatsCsvWriter {
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let total = snapshot
            .requests_total
            .map_or_else(String::new, |t| t.to_string());
        self.writer
            .write_record([
                snapshot
                    .last_timestamp
                    .format(STATS_TIMESTAMP_FORMAT)
                    .to_string(),
                snapshot.resident_count.to_string(),
                snapshot.hits.to_string(),
                snapshot.misses.to_string(),
                snapshot.requests_done.to_string(),
                total,
            ])
            .map_err(into_io)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_summary(&mut self, _summary: &RunSummary) -> io::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn into_io(err: csv::Error) -> io::Error {
    io::Error::other(err)
}
