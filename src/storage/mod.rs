//! Storage layer for the Gateway
//!
//! This module wires the record store and the record cache from configuration.

/// Record cache adapters (in-process and no-op)
pub mod cache;
/// Database storage module
pub mod database;
/// In-memory record store
pub mod memory;
/// Redis record cache
#[cfg(feature = "redis")]
pub mod redis;

use crate::config::{CacheConfig, StorageConfig};
use crate::core::traits::{RecordCache, UserStore};
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Store and cache adapters selected from configuration
#[derive(Clone)]
pub struct StorageLayer {
    /// Record store
    pub store: Arc<dyn UserStore>,
    /// Record cache
    pub cache: Arc<dyn RecordCache>,
    /// Database handle, present when the database backend is enabled
    pub database: Option<Arc<database::Database>>,
}

impl std::fmt::Debug for StorageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageLayer")
            .field("database", &self.database.is_some())
            .field("cache", &self.cache.backend())
            .finish()
    }
}

/// Health of each storage backend
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealthStatus {
    pub store: bool,
    pub cache_backend: &'static str,
    pub overall: bool,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(storage: &StorageConfig, cache: &CacheConfig) -> Result<Self> {
        info!("Initializing storage layer");

        let (store, database) = if storage.database.enabled {
            debug!("Connecting to database");
            let database = Arc::new(database::Database::new(&storage.database).await?);
            let store: Arc<dyn UserStore> = database.clone();
            (store, Some(database))
        } else {
            warn!("Database disabled, records are kept in memory only");
            let store: Arc<dyn UserStore> = Arc::new(memory::MemoryUserStore::new());
            (store, None)
        };

        let cache = Self::build_cache(storage, cache).await;
        info!(cache = cache.backend(), "Storage layer initialized successfully");

        Ok(Self {
            store,
            cache,
            database,
        })
    }

    /// Storage over explicit adapters
    pub fn from_parts(store: Arc<dyn UserStore>, cache: Arc<dyn RecordCache>) -> Self {
        Self {
            store,
            cache,
            database: None,
        }
    }

    async fn build_cache(storage: &StorageConfig, cache: &CacheConfig) -> Arc<dyn RecordCache> {
        if !cache.enabled {
            debug!("Record cache disabled");
            return Arc::new(cache::NoopCache);
        }

        #[cfg(feature = "redis")]
        if storage.redis.enabled {
            debug!("Connecting to Redis");
            let pool = Arc::new(redis::RedisPool::connect_or_noop(&storage.redis).await);
            if !pool.is_noop() {
                return Arc::new(redis::RedisRecordCache::new(pool, cache.ttl));
            }
            warn!("Falling back to the in-process record cache");
        }

        #[cfg(not(feature = "redis"))]
        if storage.redis.enabled {
            warn!("Redis requested but the redis feature is disabled, using the in-process cache");
        }

        Arc::new(cache::MokaRecordCache::from_config(cache))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        match &self.database {
            Some(database) => {
                info!("Running database migrations");
                database.migrate().await?;
                info!("Database migrations completed");
            }
            None => debug!("No database configured, skipping migrations"),
        }
        Ok(())
    }

    /// Health check for all storage backends
    pub async fn health_check(&self) -> StorageHealthStatus {
        let store = match self.store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus {
            store,
            cache_backend: self.cache.backend(),
            overall: store,
        }
    }
}
