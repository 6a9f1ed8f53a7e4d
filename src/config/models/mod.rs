//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod batch;
pub mod cache;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use batch::*;
pub use cache::*;
pub use gateway::*;
pub use logging::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Default database max connections
pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default Redis max connections
pub fn default_redis_max_connections() -> u32 {
    10
}

/// Default Redis enabled flag
pub fn default_redis_enabled() -> bool {
    false
}

/// Default cache TTL in seconds
pub fn default_cache_ttl() -> u64 {
    3600
}

/// Default in-process cache capacity (records)
pub fn default_cache_max_size() -> u64 {
    10_000
}

/// Default batch chunk size
pub fn default_chunk_size() -> usize {
    100
}

/// Upper bound a caller may request for the chunk size
pub fn default_max_chunk_size() -> usize {
    1000
}

/// Default number of chunks processed concurrently
pub fn default_max_concurrency() -> usize {
    1
}

/// Upper bound a caller may request for chunk concurrency
pub fn default_concurrency_limit() -> usize {
    16
}

/// Maximum number of ids accepted in the query-string lookup form
pub fn default_max_query_ids() -> usize {
    100
}

/// Capacity of the audit event channel
pub fn default_audit_buffer() -> usize {
    1024
}

/// Default log level directive
pub fn default_log_level() -> String {
    "info".to_string()
}
