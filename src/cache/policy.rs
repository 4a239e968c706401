//! Eviction policy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::engine::ConfigError;

/// Cache eviction policy.
///
/// Modeled as a closed enum rather than a trait hierarchy: only one policy
/// exists today, and new variants can be added without changing engine
/// callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Evict the resident entry with the oldest `last_used_at`.
    #[default]
    LeastRecentlyUsed,
}

impl EvictionPolicy {
    /// Short identifier used in statistics file names and CSV rows.
    pub fn label(&self) -> &'static str {
        match self {
            EvictionPolicy::LeastRecentlyUsed => "LRU",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "least-recently-used" => Ok(EvictionPolicy::LeastRecentlyUsed),
            _ => Err(ConfigError::UnsupportedPolicy(s.to_string())),
        }
    }
}
