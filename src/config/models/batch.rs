//! Batch engine configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Defaults and caller bounds for batch operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Chunk size used when a request does not specify one
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,
    /// Largest chunk size a request may ask for
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    /// Chunk concurrency used when a request does not specify one
    #[serde(default = "default_max_concurrency")]
    pub default_max_concurrency: usize,
    /// Largest chunk concurrency a request may ask for
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    /// Id cap for the query-string lookup form
    #[serde(default = "default_max_query_ids")]
    pub max_query_ids: usize,
    /// Capacity of the audit event channel
    #[serde(default = "default_audit_buffer")]
    pub audit_buffer: usize,
    /// Warm the record cache on startup
    #[serde(default)]
    pub warm_cache_on_startup: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
            max_chunk_size: default_max_chunk_size(),
            default_max_concurrency: default_max_concurrency(),
            concurrency_limit: default_concurrency_limit(),
            max_query_ids: default_max_query_ids(),
            audit_buffer: default_audit_buffer(),
            warm_cache_on_startup: false,
        }
    }
}

impl BatchConfig {
    /// Merge batch configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_chunk_size != default_chunk_size() {
            self.default_chunk_size = other.default_chunk_size;
        }
        if other.max_chunk_size != default_max_chunk_size() {
            self.max_chunk_size = other.max_chunk_size;
        }
        if other.default_max_concurrency != default_max_concurrency() {
            self.default_max_concurrency = other.default_max_concurrency;
        }
        if other.concurrency_limit != default_concurrency_limit() {
            self.concurrency_limit = other.concurrency_limit;
        }
        if other.max_query_ids != default_max_query_ids() {
            self.max_query_ids = other.max_query_ids;
        }
        if other.audit_buffer != default_audit_buffer() {
            self.audit_buffer = other.audit_buffer;
        }
        if other.warm_cache_on_startup {
            self.warm_cache_on_startup = true;
        }
        self
    }

    /// Validate batch configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_chunk_size == 0 || self.max_chunk_size == 0 {
            return Err("Chunk sizes must be greater than 0".to_string());
        }
        if self.default_chunk_size > self.max_chunk_size {
            return Err(format!(
                "default_chunk_size ({}) exceeds max_chunk_size ({})",
                self.default_chunk_size, self.max_chunk_size
            ));
        }
        if self.default_max_concurrency == 0 || self.concurrency_limit == 0 {
            return Err("Chunk concurrency must be greater than 0".to_string());
        }
        if self.default_max_concurrency > self.concurrency_limit {
            return Err(format!(
                "default_max_concurrency ({}) exceeds concurrency_limit ({})",
                self.default_max_concurrency, self.concurrency_limit
            ));
        }
        if self.max_query_ids == 0 {
            return Err("max_query_ids must be greater than 0".to_string());
        }
        if self.audit_buffer == 0 {
            return Err("audit_buffer must be greater than 0".to_string());
        }
        Ok(())
    }
}
