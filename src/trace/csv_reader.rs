//! Semicolon-delimited trace file reading.
//!
//! Trace files carry one `ID;timestamp;query` record per line after a single
//! header line, with timestamps like `2021-04-01T00:00:01.038Z`. Records are
//! streamed one at a time; the whole file is never loaded into memory. A
//! record that cannot be interpreted fails the read with the offending
//! 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use thiserror::Error;

use crate::cache::Request;
use crate::replay::RequestSource;

/// Trace timestamp format, e.g. `2021-04-01T00:00:01.038Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Failure while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A record that could not be interpreted as a request.
    #[error("malformed trace record at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
    /// The underlying file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for TraceError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => TraceError::Io(io),
            _ => TraceError::Malformed { line, reason },
        }
    }
}

/// Streaming [`RequestSource`] over `ID;timestamp;query` trace files.
#[derive(Debug)]
pub struct CsvTraceReader {
    reader: csv::Reader<File>,
    record: StringRecord,
    total_records: Option<u64>,
}

impl CsvTraceReader {
    /// Open a trace file. The record total is unknown, so replay progress
    /// will not include percentages.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        Ok(Self {
            reader,
            record: StringRecord::new(),
            total_records: None,
        })
    }

    /// Open a trace file, pre-counting its records so progress reporting can
    /// show totals. Costs one extra streaming pass over the file.
    pub fn open_counted(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let total = count_records(path.as_ref())?;
        let mut source = Self::open(path)?;
        source.total_records = Some(total);
        Ok(source)
    }

    fn parse_record(record: &StringRecord) -> Result<Request, TraceError> {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() < 3 {
            return Err(TraceError::Malformed {
                line,
                reason: format!(
                    "expected 3 fields `ID;timestamp;query`, got {}",
                    record.len()
                ),
            });
        }

        record
            .get(0)
            .unwrap_or_default()
            .trim()
            .parse::<u64>()
            .map_err(|e| TraceError::Malformed {
                line,
                reason: format!("record id is not an integer: {e}"),
            })?;

        let raw_timestamp = record.get(1).unwrap_or_default().trim();
        let timestamp: DateTime<Utc> = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| TraceError::Malformed {
                line,
                reason: format!("bad timestamp {raw_timestamp:?}: {e}"),
            })?
            .and_utc();

        let key = record.get(2).unwrap_or_default().trim();
        if key.is_empty() {
            return Err(TraceError::Malformed {
                line,
                reason: "empty query field".into(),
            });
        }

        Ok(Request::new(key, timestamp))
    }
}

impl RequestSource for CsvTraceReader {
    fn next_request(&mut self) -> Result<Option<Request>, TraceError> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        Self::parse_record(&self.record).map(Some)
    }

    fn len_hint(&self) -> Option<u64> {
        self.total_records
    }
}

/// Count the data records in a trace file (header excluded), streaming.
pub fn count_records(path: impl AsRef<Path>) -> Result<u64, TraceError> {
    let file = File::open(path.as_ref())?;
    let mut lines: u64 = 0;
    for line in BufReader::new(file).lines() {
        line?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}
