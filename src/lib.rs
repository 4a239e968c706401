//! Offline trace-driven response cache simulator.
//!
//! Replays a timestamped request trace through a simulated cache under a
//! configurable capacity, TTL, and eviction policy, and reports hit/miss
//! statistics. Used to evaluate how cache size and TTL affect hit ratio on
//! a recorded trace; it is a simulator, not a live cache.
//!
//! The core is [`cache::CacheEngine`] (admission, TTL expiry, LRU eviction,
//! hit/miss accounting) driven by [`replay::TraceReplayer`]. Trace files,
//! statistics files, and progress logging live at the edges in [`trace`]
//! and [`report`].

pub mod cache;
pub mod config;
pub mod replay;
pub mod report;
pub mod trace;

pub use cache::{CacheEngine, CacheEntry, ConfigError, EvictionPolicy, Outcome, Request};
pub use config::{BatchPlan, SimConfig};
pub use replay::{
    ReplayError, ReplayObserver, RequestSource, RunSummary, Snapshot, TraceReplayer,
};
pub use trace::{CsvTraceReader, TraceError};
