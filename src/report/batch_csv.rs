//! Batch sweep result file writing.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::config::SimConfig;
use crate::replay::RunSummary;

/// Appends one semicolon-delimited summary row per completed configuration
/// to the batch result file.
pub struct BatchCsvWriter {
    writer: csv::Writer<File>,
}

impl BatchCsvWriter {
    /// Create (truncate) the batch result file and write its header line.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(path.as_ref())
            .map_err(into_io)?;
        writer
            .write_record([
                "Total requests",
                "Cache Strategy",
                "TTL [sec]",
                "TTL [min]",
                "Cache Size",
                "Hits",
                "Misses",
                "Efficiency [% cached]",
                "Data-file",
            ])
            .map_err(into_io)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Append the summary row for one (capacity, TTL) configuration.
    pub fn append(
        &mut self,
        config: &SimConfig,
        summary: &RunSummary,
        trace_file: &Path,
    ) -> io::Result<()> {
        self.writer
            .write_record([
                summary.total_requests.to_string(),
                config.policy.label().to_string(),
                config.ttl_secs.to_string(),
                format!("{}", config.ttl_secs as f64 / 60.0),
                config.capacity.to_string(),
                summary.hits.to_string(),
                summary.misses.to_string(),
                summary.hit_ratio().to_string(),
                trace_file.display().to_string(),
            ])
            .map_err(into_io)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn into_io(err: csv::Error) -> io::Error {
    io::Error::other(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EvictionPolicy;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_appends_one_row_per_configuration() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batch_result.csv");
        let mut writer = BatchCsvWriter::create(&path).unwrap();

        let config = SimConfig::new(1000, 90, EvictionPolicy::LeastRecentlyUsed);
        let summary = RunSummary {
            total_requests: 100,
            hits: 25,
            misses: 75,
            final_resident_count: 40,
        };
        writer
            .append(&config, &summary, &PathBuf::from("trace.csv"))
            .unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "100;LRU;90;1.5;1000;25;75;0.25;trace.csv");
    }
}
