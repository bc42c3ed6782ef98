//! Configuration types

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PolyglotResult};

/// Environment variable for [`CacheConfig::initial_capacity`].
pub const ENV_INITIAL_CAPACITY: &str = "POLYGLOT_CACHE_INITIAL_CAPACITY";
/// Environment variable for [`CacheConfig::shard_amount`].
pub const ENV_SHARDS: &str = "POLYGLOT_CACHE_SHARDS";
/// Environment variable for [`CacheConfig::record_stats`].
pub const ENV_RECORD_STATS: &str = "POLYGLOT_CACHE_RECORD_STATS";

/// Configuration for the context cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of entries to reserve up front.
    pub initial_capacity: usize,
    /// Number of map shards. `None` lets the map pick from the CPU count.
    pub shard_amount: Option<usize>,
    /// Whether hit/miss/insert counters are maintained.
    pub record_stats: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            shard_amount: None,
            record_stats: true,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `POLYGLOT_CACHE_*` environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let initial_capacity = lookup(ENV_INITIAL_CAPACITY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.initial_capacity);

        let shard_amount = lookup(ENV_SHARDS)
            .and_then(|s| s.trim().parse().ok())
            .or(defaults.shard_amount);

        let record_stats = lookup(ENV_RECORD_STATS)
            .map(|s| s.trim().to_lowercase() != "false")
            .unwrap_or(defaults.record_stats);

        Self {
            initial_capacity,
            shard_amount,
            record_stats,
        }
    }

    /// Set the initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the shard amount.
    pub fn with_shard_amount(mut self, shards: usize) -> Self {
        self.shard_amount = Some(shards);
        self
    }

    /// Enable or disable stats recording.
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.record_stats = enabled;
        self
    }

    /// Check the configuration for values the cache cannot run with.
    pub fn validate(&self) -> PolyglotResult<()> {
        if let Some(shards) = self.shard_amount {
            if shards < 2 || !shards.is_power_of_two() {
                return Err(ConfigError::InvalidValue {
                    field: "shard_amount".to_string(),
                    value: shards.to_string(),
                    reason: "must be a power of two greater than 1".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}
