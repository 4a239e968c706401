//! Trace replay: drives the cache engine from an ordered request source.

pub mod replayer;

pub use replayer::{
    NullObserver, ReplayError, ReplayObserver, RequestSource, RunSummary, Snapshot,
    TraceReplayer, DEFAULT_SNAPSHOT_INTERVAL,
};
