//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Record cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Batch engine configuration
    #[serde(default)]
    pub batch: BatchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Build a configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        debug!("Applying environment overrides");

        if let Ok(host) = env::var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("GATEWAY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid port: {}", e)))?;
        }
        if let Ok(db_url) = env::var("DATABASE_URL") {
            self.storage.database.url = db_url;
            self.storage.database.enabled = true;
        }
        if let Ok(redis_url) = env::var("REDIS_URL") {
            self.storage.redis.url = redis_url;
            self.storage.redis.enabled = true;
        }
        if let Ok(chunk_size) = env::var("BATCH_CHUNK_SIZE") {
            self.batch.default_chunk_size = chunk_size
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid chunk size: {}", e)))?;
        }
        if let Ok(concurrency) = env::var("BATCH_MAX_CONCURRENCY") {
            self.batch.default_max_concurrency = concurrency
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid concurrency: {}", e)))?;
        }
        Ok(())
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.storage = self.storage.merge(other.storage);
        self.cache = self.cache.merge(other.cache);
        self.batch = self.batch.merge(other.batch);
        self.logging = self.logging.merge(other.logging);
        self
    }
}
