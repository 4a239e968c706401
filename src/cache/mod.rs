//! Simulated response cache with TTL expiry and LRU eviction.

pub mod engine;
pub mod policy;

pub use engine::{CacheEngine, CacheEntry, ConfigError, Outcome, Request};
pub use policy::EvictionPolicy;
