//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::batch::BatchEngine;
use crate::core::traits::EventEmitter;
use crate::storage::StorageLayer;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are cheap to clone; actix clones the state once per worker.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Store and cache adapters
    pub storage: Arc<StorageLayer>,
    /// Batch engine over the storage adapters
    pub engine: BatchEngine,
}

impl AppState {
    /// Build the engine over the storage layer and event sink
    pub fn new(config: Config, storage: StorageLayer, events: Arc<dyn EventEmitter>) -> Self {
        let engine = BatchEngine::new(storage.store.clone(), storage.cache.clone(), events);
        Self::with_engine(config, storage, engine)
    }

    /// Use an already configured engine
    pub fn with_engine(config: Config, storage: StorageLayer, engine: BatchEngine) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            engine,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
