//! Cache configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Record cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable caching (a no-op cache is used otherwise)
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
    /// Maximum number of records held by the in-process cache
    #[serde(default = "default_cache_max_size")]
    pub max_size: u64,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl: default_cache_ttl(),
            max_size: default_cache_max_size(),
        }
    }
}

impl CacheConfig {
    /// Merge cache configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = other.enabled;
        }
        if other.ttl != default_cache_ttl() {
            self.ttl = other.ttl;
        }
        if other.max_size != default_cache_max_size() {
            self.max_size = other.max_size;
        }
        self
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.ttl == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }
        if self.enabled && self.max_size == 0 {
            return Err("Cache max_size must be greater than 0".to_string());
        }
        Ok(())
    }
}
