//! Trace-driven cache engine with TTL expiry and LRU eviction.
//!
//! The engine owns all simulation state: the resident entry map, the running
//! hit/miss counters, and the clock floor used for elapsed-time reporting.
//! Expiration is applied with the incoming request's timestamp before the
//! hit/miss decision, so results depend only on the trace, the capacity, and
//! the TTL. The engine performs no I/O.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::policy::EvictionPolicy;

/// A single lookup request read from a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Lookup key (the recorded query string).
    pub key: String,
    /// Arrival timestamp. Traces are expected, but not required, to be
    /// ordered by non-decreasing timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Request {
    pub fn new(key: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            timestamp,
        }
    }
}

/// Classification of a processed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The key was resident and not expired.
    Hit,
    /// The key was absent, expired, or never seen; it was (re-)admitted.
    Miss,
}

/// Bookkeeping for one resident key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Number of requests served by this entry, admission included.
    pub hit_count: u64,
    /// Admission timestamp. Never changes; expiry is measured from here.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent request for this key.
    pub last_used_at: DateTime<Utc>,
}

/// Invalid engine configuration, reported at construction or CLI parse time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cache capacity must be non-negative, got {0}")]
    NegativeCapacity(i64),
    #[error("cache TTL must be non-negative, got {0} seconds")]
    NegativeTtl(i64),
    #[error("unsupported eviction policy: {0:?}")]
    UnsupportedPolicy(String),
}

/// Simulated response cache.
///
/// `process` runs one request through the expire → classify → admit
/// sequence and returns its [`Outcome`]. A capacity of 0 degenerates to a
/// cache that always misses and never retains an entry.
#[derive(Debug, Clone)]
pub struct CacheEngine {
    capacity: usize,
    ttl: TimeDelta,
    policy: EvictionPolicy,
    entries: HashMap<String, CacheEntry>,
    requests_seen: u64,
    hits: u64,
    misses: u64,
    clock_floor: Option<DateTime<Utc>>,
}

impl CacheEngine {
    /// Create an engine, validating capacity and TTL.
    pub fn new(
        capacity: i64,
        ttl: TimeDelta,
        policy: EvictionPolicy,
    ) -> Result<Self, ConfigError> {
        if capacity < 0 {
            return Err(ConfigError::NegativeCapacity(capacity));
        }
        if ttl < TimeDelta::zero() {
            return Err(ConfigError::NegativeTtl(ttl.num_seconds()));
        }
        Ok(Self {
            capacity: capacity as usize,
            ttl,
            policy,
            entries: HashMap::new(),
            requests_seen: 0,
            hits: 0,
            misses: 0,
            clock_floor: None,
        })
    }

    /// Run one request through the cache and classify it.
    ///
    /// Expired entries are removed first, using the request's timestamp as
    /// "now", so a key whose TTL has elapsed re-admits as a fresh miss.
    pub fn process(&mut self, request: &Request) -> Outcome {
        if self.clock_floor.is_none() {
            self.clock_floor = Some(request.timestamp);
        }

        self.expire(request.timestamp);

        let outcome = match self.entries.get_mut(&request.key) {
            Some(entry) => {
                entry.hit_count += 1;
                entry.last_used_at = request.timestamp;
                self.hits += 1;
                Outcome::Hit
            }
            None => {
                self.misses += 1;
                self.admit(request);
                Outcome::Miss
            }
        };

        self.requests_seen += 1;
        debug!(
            key = %request.key,
            outcome = ?outcome,
            resident = self.entries.len(),
            "processed request"
        );
        outcome
    }

    /// Number of entries currently resident.
    pub fn count_resident(&self) -> usize {
        self.entries.len()
    }

    /// Total hits so far.
    pub fn count_hits(&self) -> u64 {
        self.hits
    }

    /// Total misses so far.
    pub fn count_misses(&self) -> u64 {
        self.misses
    }

    /// Total requests processed so far.
    pub fn count_requests(&self) -> u64 {
        self.requests_seen
    }

    /// Configured capacity in items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured entry time-to-live.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Configured eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Timestamp of the first request ever processed, if any.
    pub fn clock_floor(&self) -> Option<DateTime<Utc>> {
        self.clock_floor
    }

    // -- private helpers ---------------------------------------------------

    /// Remove every entry whose TTL has elapsed relative to `now`.
    ///
    /// Full scan over resident entries. Correct regardless of trace
    /// ordering, and bounded by the capacity invariant.
    fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, e| now <= e.created_at + ttl);
        let expired = before - self.entries.len();
        if expired > 0 {
            debug!(expired, "TTL expirations");
        }
    }

    /// Insert a fresh entry for a missed request, evicting first if full.
    fn admit(&mut self, request: &Request) {
        if self.capacity == 0 {
            // Degenerate cache: nothing is ever retained.
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.entries.insert(
            request.key.clone(),
            CacheEntry {
                hit_count: 1,
                created_at: request.timestamp,
                last_used_at: request.timestamp,
            },
        );
    }

    /// Remove exactly one entry chosen by the eviction policy.
    ///
    /// Ties on `last_used_at` break on older `created_at`, then on the
    /// lexicographically smaller key, keeping victim selection independent
    /// of map iteration order.
    fn evict_one(&mut self) {
        let victim = match self.policy {
            EvictionPolicy::LeastRecentlyUsed => self
                .entries
                .iter()
                .min_by(|(ka, ea), (kb, eb)| {
                    (ea.last_used_at, ea.created_at, ka.as_str())
                        .cmp(&(eb.last_used_at, eb.created_at, kb.as_str()))
                })
                .map(|(key, _)| key.clone()),
        };
        if let Some(key) = victim {
            debug!(key = %key, "evicting least recently used entry");
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(offset_secs)
    }

    fn req(key: &str, offset_secs: i64) -> Request {
        Request::new(key, ts(offset_secs))
    }

    fn engine(capacity: i64, ttl_secs: i64) -> CacheEngine {
        CacheEngine::new(
            capacity,
            TimeDelta::seconds(ttl_secs),
            EvictionPolicy::LeastRecentlyUsed,
        )
        .unwrap()
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let err = CacheEngine::new(
            -100,
            TimeDelta::seconds(1),
            EvictionPolicy::LeastRecentlyUsed,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NegativeCapacity(-100));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let err = CacheEngine::new(
            100,
            TimeDelta::seconds(-1),
            EvictionPolicy::LeastRecentlyUsed,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NegativeTtl(-1));
    }

    #[test]
    fn test_first_request_is_a_miss() {
        let mut cache = engine(100, 1);
        assert_eq!(cache.process(&req("QRY1", 0)), Outcome::Miss);
        assert_eq!(cache.count_misses(), 1);
        assert_eq!(cache.count_hits(), 0);
        assert_eq!(cache.count_resident(), 1);
    }

    #[test]
    fn test_repeat_within_ttl_is_a_hit() {
        // 10 minutes between requests, TTL 1000s: second request hits.
        let mut cache = engine(100, 1000);
        assert_eq!(cache.process(&req("QRY1", 0)), Outcome::Miss);
        assert_eq!(cache.process(&req("QRY1", 600)), Outcome::Hit);
        assert_eq!(cache.count_misses(), 1, "only the first request misses");
        assert_eq!(cache.count_hits(), 1);
    }

    #[test]
    fn test_ttl_expiry_readmits_as_fresh_miss() {
        // TTL 9s, second request 600s later: the entry expired in between.
        let mut cache = engine(100, 9);
        assert_eq!(cache.process(&req("QRY1", 0)), Outcome::Miss);
        assert_eq!(cache.process(&req("QRY1", 600)), Outcome::Miss);
        assert_eq!(cache.count_misses(), 2, "expected 2 misses");

        // Re-admission is a brand-new entry, not a refresh.
        let entry = cache.entries.get("QRY1").unwrap();
        assert_eq!(entry.created_at, ts(600));
        assert_eq!(entry.hit_count, 1);
    }

    #[test]
    fn test_resident_at_exact_ttl_boundary() {
        // T' == T + D is still a hit; T' > T + D is not.
        let mut cache = engine(100, 10);
        cache.process(&req("QRY1", 0));
        assert_eq!(cache.process(&req("QRY1", 10)), Outcome::Hit);

        let mut cache = engine(100, 10);
        cache.process(&req("QRY1", 0));
        assert_eq!(cache.process(&req("QRY1", 11)), Outcome::Miss);
    }

    #[test]
    fn test_hit_refreshes_recency_not_creation() {
        // A hit must not extend the TTL: expiry stays anchored to admission.
        let mut cache = engine(100, 10);
        cache.process(&req("QRY1", 0));
        assert_eq!(cache.process(&req("QRY1", 5)), Outcome::Hit);
        let entry = cache.entries.get("QRY1").unwrap();
        assert_eq!(entry.created_at, ts(0), "created_at never changes");
        assert_eq!(entry.last_used_at, ts(5));
        assert_eq!(cache.process(&req("QRY1", 12)), Outcome::Miss);
    }

    #[test]
    fn test_capacity_bound_with_displacement() {
        // Capacity 2: a repeated key refreshes rather than duplicates, and
        // the third distinct-key admission stays within the bound.
        let mut cache = engine(2, 100);
        cache.process(&req("QRY1", 0));
        cache.process(&req("QRY1", 10));
        cache.process(&req("QRY3", 11));
        assert_eq!(cache.count_resident(), 2, "limited cache size");
        assert_eq!(cache.entries.get("QRY1").unwrap().hit_count, 2);
    }

    #[test]
    fn test_eviction_removes_least_recently_used() {
        let mut cache = engine(2, 1000);
        cache.process(&req("A", 0));
        cache.process(&req("B", 1));
        cache.process(&req("A", 2)); // A is now the most recently used
        cache.process(&req("C", 3)); // forces eviction of B
        assert!(cache.entries.contains_key("A"), "recently used key survives");
        assert!(!cache.entries.contains_key("B"), "LRU key is evicted");
        assert!(cache.entries.contains_key("C"));
        assert_eq!(cache.count_resident(), 2);
    }

    #[test]
    fn test_eviction_removes_exactly_one_minimal_entry() {
        let mut cache = engine(3, 1000);
        cache.process(&req("A", 0));
        cache.process(&req("B", 1));
        cache.process(&req("C", 2));
        let evicted_before = cache.count_resident();
        cache.process(&req("D", 3));
        assert_eq!(cache.count_resident(), evicted_before, "one in, one out");
        let min_recency = cache
            .entries
            .values()
            .map(|e| e.last_used_at)
            .min()
            .unwrap();
        // The victim (A, last used at t=0) had minimal recency.
        assert!(min_recency >= ts(1), "no survivor older than the victim");
    }

    #[test]
    fn test_capacity_zero_never_retains() {
        let mut cache = engine(0, 1000);
        for i in 0..5 {
            assert_eq!(cache.process(&req("QRY1", i)), Outcome::Miss);
            assert_eq!(cache.count_resident(), 0);
        }
        assert_eq!(cache.count_misses(), 5);
        assert_eq!(cache.count_hits(), 0);
    }

    #[test]
    fn test_accounting_invariants_hold_throughout() {
        let mut cache = engine(3, 50);
        let keys = ["A", "B", "C", "D", "A", "B", "A", "E", "F", "A"];
        for (i, key) in keys.iter().enumerate() {
            cache.process(&req(key, i as i64 * 20));
            assert!(cache.count_resident() <= 3, "capacity bound violated");
            assert_eq!(
                cache.count_hits() + cache.count_misses(),
                cache.count_requests(),
                "hits + misses must equal requests seen"
            );
        }
        assert_eq!(cache.count_requests(), keys.len() as u64);
    }

    #[test]
    fn test_expiration_applies_before_classification() {
        // With TTL 0, an entry is only ever a hit at its own timestamp.
        let mut cache = engine(100, 0);
        cache.process(&req("QRY1", 0));
        assert_eq!(cache.process(&req("QRY1", 0)), Outcome::Hit);
        assert_eq!(cache.process(&req("QRY1", 1)), Outcome::Miss);
    }

    #[test]
    fn test_clock_floor_records_first_timestamp() {
        let mut cache = engine(10, 100);
        assert_eq!(cache.clock_floor(), None);
        cache.process(&req("A", 42));
        cache.process(&req("B", 50));
        assert_eq!(cache.clock_floor(), Some(ts(42)));
    }
}
