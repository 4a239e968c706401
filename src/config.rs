//! Run configuration and batch sweep planning.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheEngine, ConfigError, EvictionPolicy};

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Maximum number of distinct keys resident at once.
    pub capacity: i64,
    /// Entry time-to-live in seconds, measured from admission.
    pub ttl_secs: i64,
    /// Eviction policy.
    pub policy: EvictionPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            ttl_secs: 60,
            policy: EvictionPolicy::LeastRecentlyUsed,
        }
    }
}

impl SimConfig {
    pub fn new(capacity: i64, ttl_secs: i64, policy: EvictionPolicy) -> Self {
        Self {
            capacity,
            ttl_secs,
            policy,
        }
    }

    /// Build a cache engine, validating capacity and TTL.
    pub fn build_engine(&self) -> Result<CacheEngine, ConfigError> {
        CacheEngine::new(self.capacity, TimeDelta::seconds(self.ttl_secs), self.policy)
    }

    /// Conventional name of the per-run statistics file.
    pub fn stats_file_name(&self) -> String {
        format!(
            "S_{}_T_{}_{}.csv",
            self.capacity,
            self.ttl_secs,
            self.policy.label()
        )
    }
}

/// Grid of (capacity, TTL) configurations for a batch sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub capacities: Vec<i64>,
    pub ttls_secs: Vec<i64>,
    pub policy: EvictionPolicy,
}

impl Default for BatchPlan {
    fn default() -> Self {
        Self {
            capacities: vec![1_000, 10_000, 100_000, 1_000_000],
            ttls_secs: vec![
                15,
                30,
                60,
                2 * 60,
                5 * 60,
                10 * 60,
                30 * 60,
                60 * 60,
                2 * 60 * 60,
                4 * 60 * 60,
                8 * 60 * 60,
            ],
            policy: EvictionPolicy::LeastRecentlyUsed,
        }
    }
}

impl BatchPlan {
    /// Enumerate run configurations in sweep order (capacity-major).
    pub fn configs(&self) -> impl Iterator<Item = SimConfig> + '_ {
        self.capacities.iter().flat_map(move |&capacity| {
            self.ttls_secs
                .iter()
                .map(move |&ttl_secs| SimConfig::new(capacity, ttl_secs, self.policy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.ttl_secs, 60);
        assert_eq!(config.policy, EvictionPolicy::LeastRecentlyUsed);
    }

    #[test]
    fn test_stats_file_name_encodes_configuration() {
        let config = SimConfig::new(1000, 90, EvictionPolicy::LeastRecentlyUsed);
        assert_eq!(config.stats_file_name(), "S_1000_T_90_LRU.csv");
    }

    #[test]
    fn test_build_engine_validates() {
        assert!(SimConfig::new(-1, 60, EvictionPolicy::LeastRecentlyUsed)
            .build_engine()
            .is_err());
        assert!(SimConfig::new(10, -1, EvictionPolicy::LeastRecentlyUsed)
            .build_engine()
            .is_err());
        assert!(SimConfig::default().build_engine().is_ok());
    }

    #[test]
    fn test_default_batch_plan_covers_full_grid() {
        let plan = BatchPlan::default();
        let configs: Vec<SimConfig> = plan.configs().collect();
        assert_eq!(configs.len(), 4 * 11);
        assert_eq!(configs[0].capacity, 1_000);
        assert_eq!(configs[0].ttl_secs, 15);
        let last = configs.last().unwrap();
        assert_eq!(last.capacity, 1_000_000);
        assert_eq!(last.ttl_secs, 8 * 60 * 60);
    }
}
