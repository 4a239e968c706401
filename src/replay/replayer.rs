//! Replay loop with run totals and periodic statistics snapshots.
//!
//! The replayer is pure orchestration: it pulls requests one at a time from
//! a [`RequestSource`], feeds them to the [`CacheEngine`], and reports
//! progress to a [`ReplayObserver`]. Observation never mutates engine state,
//! so observers cannot change hit/miss results.

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheEngine, Request};
use crate::trace::TraceError;

/// Default number of processed requests between statistics snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 10_000;

/// Pull interface over an ordered, finite request stream.
///
/// The replayer does not care whether requests come from a file, a
/// generator, or an in-memory list; malformed-record policy belongs to the
/// source, which rejects a bad record by returning an error.
pub trait RequestSource {
    /// Return the next request, or `Ok(None)` at end of stream.
    fn next_request(&mut self) -> Result<Option<Request>, TraceError>;

    /// Total number of requests this source expects to produce, if known.
    /// Used only for progress reporting.
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

/// Periodic statistics emitted during a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Timestamp of the most recently processed request.
    pub last_timestamp: DateTime<Utc>,
    /// Entries resident at snapshot time.
    pub resident_count: usize,
    /// Hits so far.
    pub hits: u64,
    /// Misses so far.
    pub misses: u64,
    /// Requests processed so far in this replay.
    pub requests_done: u64,
    /// Expected total requests, when the source knows it.
    pub requests_total: Option<u64>,
}

/// Totals for one completed replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Requests processed, limit applied.
    pub total_requests: u64,
    /// Total hits.
    pub hits: u64,
    /// Total misses.
    pub misses: u64,
    /// Entries still resident when the replay ended.
    pub final_resident_count: usize,
}

impl RunSummary {
    /// Fraction of requests served from cache, in `[0, 1]`.
    pub fn hit_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

/// Receives snapshots and the final summary of a replay.
pub trait ReplayObserver {
    fn on_snapshot(&mut self, _snapshot: &Snapshot) -> io::Result<()> {
        Ok(())
    }

    fn on_summary(&mut self, _summary: &RunSummary) -> io::Result<()> {
        Ok(())
    }
}

/// Observer that discards everything. Useful when only the summary matters.
pub struct NullObserver;

impl ReplayObserver for NullObserver {}

impl ReplayObserver for Vec<Box<dyn ReplayObserver>> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        for observer in self.iter_mut() {
            observer.on_snapshot(snapshot)?;
        }
        Ok(())
    }

    fn on_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        for observer in self.iter_mut() {
            observer.on_summary(summary)?;
        }
        Ok(())
    }
}

/// Replay failure. The engine is left exactly as it was after the last
/// successfully processed request.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The source produced a record that could not be interpreted.
    #[error(transparent)]
    Input(#[from] TraceError),
    /// An observer failed to record a snapshot or summary.
    #[error("failed to record replay statistics: {0}")]
    Observer(#[from] io::Error),
}

/// Drives a [`CacheEngine`] through a request stream, one request at a time.
pub struct TraceReplayer {
    engine: CacheEngine,
    snapshot_interval: u64,
}

impl TraceReplayer {
    pub fn new(engine: CacheEngine) -> Self {
        Self {
            engine,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
        }
    }

    /// Snapshot cadence in processed requests, clamped to a minimum of 1.
    pub fn with_snapshot_interval(mut self, interval: u64) -> Self {
        self.snapshot_interval = interval.max(1);
        self
    }

    pub fn engine(&self) -> &CacheEngine {
        &self.engine
    }

    pub fn into_engine(self) -> CacheEngine {
        self.engine
    }

    /// Consume requests from `source` in order until end of stream or until
    /// `limit` requests have been processed, whichever comes first.
    ///
    /// Every `snapshot_interval` processed requests a [`Snapshot`] is sent
    /// to `observer`; the final [`RunSummary`] is sent once the stream ends.
    pub fn replay<S, O>(
        &mut self,
        source: &mut S,
        observer: &mut O,
        limit: Option<u64>,
    ) -> Result<RunSummary, ReplayError>
    where
        S: RequestSource + ?Sized,
        O: ReplayObserver + ?Sized,
    {
        let requests_total = match (limit, source.len_hint()) {
            (Some(l), Some(n)) => Some(l.min(n)),
            (Some(l), None) => Some(l),
            (None, hint) => hint,
        };

        let mut processed: u64 = 0;
        while limit.map_or(true, |l| processed < l) {
            let Some(request) = source.next_request()? else {
                break;
            };
            self.engine.process(&request);
            processed += 1;

            if processed % self.snapshot_interval == 0 {
                let snapshot = Snapshot {
                    last_timestamp: request.timestamp,
                    resident_count: self.engine.count_resident(),
                    hits: self.engine.count_hits(),
                    misses: self.engine.count_misses(),
                    requests_done: processed,
                    requests_total,
                };
                observer.on_snapshot(&snapshot)?;
            }
        }

        let summary = RunSummary {
            total_requests: processed,
            hits: self.engine.count_hits(),
            misses: self.engine.count_misses(),
            final_resident_count: self.engine.count_resident(),
        };
        debug!(
            total = summary.total_requests,
            hits = summary.hits,
            misses = summary.misses,
            "replay finished"
        );
        observer.on_summary(&summary)?;
        Ok(summary)
    }
}
