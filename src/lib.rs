//! # catalog-gateway
//!
//! Batch operation engine for user records: chunked create, lookup, update and soft-delete
//! with per-item failure reporting, a cache-aside read path and fire-and-forget audit events.
//!
//! ## Embedding the engine
//!
//! ```rust,no_run
//! use catalog_gateway::core::audit::AuditEmitter;
//! use catalog_gateway::core::batch::{BatchEngine, BatchProcessingOptions};
//! use catalog_gateway::core::models::NewUser;
//! use catalog_gateway::storage::{cache::MokaRecordCache, memory::MemoryUserStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = BatchEngine::new(
//!         Arc::new(MemoryUserStore::new()),
//!         Arc::new(MokaRecordCache::new(10_000, Duration::from_secs(3600))),
//!         Arc::new(AuditEmitter::new(1024)),
//!     );
//!
//!     let items = vec![NewUser::new("alice", "alice@example.com", "correct-horse")];
//!     let result = engine
//!         .create_users(&items, &BatchProcessingOptions::default())
//!         .await;
//!     println!("{} created, {} failed", result.stats.successful, result.stats.failed);
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use catalog_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    BatchEngine, BatchOperationResult, BatchProcessingOptions, BatchStats, FailedItem,
    FailurePolicy,
};
pub use core::models::{NewUser, User, UserPatch, UserUpdate};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// Gateway: storage, engine and HTTP server wired from configuration
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(&config).await?;
        server.migrate().await?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting catalog gateway");

        if self.config.gateway.batch.warm_cache_on_startup {
            self.server.warm_cache().await?;
        }

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information baked in by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert_eq!(info.version, VERSION);
        assert!(!info.git_hash.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "catalog-gateway");
        assert_eq!(DESCRIPTION, env!("CARGO_PKG_DESCRIPTION"));
    }
}
