//! Snapshot progress logging.

use std::io;

use tracing::info;

use crate::replay::{ReplayObserver, Snapshot};

/// Logs one `info!` line per snapshot so long replays show liveness.
pub struct ProgressLogger;

impl ReplayObserver for ProgressLogger {
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        match snapshot.requests_total {
            Some(total) if total > 0 => info!(
                "Processed {:.2}% requests ({}/{})  Cache size {} | Hits {} | {}",
                snapshot.requests_done as f64 / total as f64 * 100.0,
                snapshot.requests_done,
                total,
                snapshot.resident_count,
                snapshot.hits,
                snapshot.last_timestamp,
            ),
            _ => info!(
                "Processed {} requests  Cache size {} | Hits {} | {}",
                snapshot.requests_done,
                snapshot.resident_count,
                snapshot.hits,
                snapshot.last_timestamp,
            ),
        }
        Ok(())
    }
}
