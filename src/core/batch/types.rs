//! Batch processing types and data structures

use crate::config::BatchConfig;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

/// Item already stored under the same natural key
pub const ALREADY_EXISTS: &str = "already exists";
/// A later occurrence of a key or id already seen in the same call
pub const DUPLICATE_IN_REQUEST: &str = "duplicate in request";
/// Natural key owned by a different record
pub const CONFLICT: &str = "conflict";
/// No active record with the id
pub const NOT_FOUND: &str = "not found";
/// Id that is not a well-formed UUID
pub const INVALID_ID_FORMAT: &str = "invalid id format";
/// Patch touching a credential field
pub const CREDENTIAL_POLICY_VIOLATION: &str = "policy violation: credential updates forbidden";
/// Patch with no fields
pub const EMPTY_UPDATE: &str = "empty update";

/// Reason attached to items that were never attempted because an earlier chunk failed
pub fn processing_stopped(error: &str) -> String {
    format!("processing stopped: {}", error)
}

/// What a store error inside a chunk does to the rest of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the chunk's items and keep going
    #[default]
    IsolateChunk,
    /// Fail the chunk and every remaining chunk, then stop
    AbortAll,
}

impl FailurePolicy {
    /// Map the wire `continueOnError` flag
    pub fn from_continue_on_error(continue_on_error: bool) -> Self {
        if continue_on_error {
            FailurePolicy::IsolateChunk
        } else {
            FailurePolicy::AbortAll
        }
    }
}

/// Per-call processing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProcessingOptions {
    chunk_size: usize,
    max_concurrency: usize,
    failure_policy: FailurePolicy,
}

impl Default for BatchProcessingOptions {
    fn default() -> Self {
        Self {
            chunk_size: crate::config::default_chunk_size(),
            max_concurrency: crate::config::default_max_concurrency(),
            failure_policy: FailurePolicy::IsolateChunk,
        }
    }
}

impl BatchProcessingOptions {
    /// Build options, rejecting a zero chunk size or concurrency
    pub fn new(
        chunk_size: usize,
        max_concurrency: usize,
        failure_policy: FailurePolicy,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(GatewayError::validation("chunk size must be at least 1"));
        }
        if max_concurrency == 0 {
            return Err(GatewayError::validation("max concurrency must be at least 1"));
        }
        Ok(Self {
            chunk_size,
            max_concurrency,
            failure_policy,
        })
    }

    /// Defaults taken from the batch configuration
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            chunk_size: config.default_chunk_size.max(1),
            max_concurrency: config.default_max_concurrency.max(1),
            failure_policy: FailurePolicy::IsolateChunk,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn with_chunk_size(self, chunk_size: usize) -> Result<Self> {
        Self::new(chunk_size, self.max_concurrency, self.failure_policy)
    }

    pub fn with_max_concurrency(self, max_concurrency: usize) -> Result<Self> {
        Self::new(self.chunk_size, max_concurrency, self.failure_policy)
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

/// Options as sent by HTTP callers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptionsRequest {
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    #[serde(default)]
    pub continue_on_error: Option<bool>,
}

impl BatchOptionsRequest {
    /// Resolve against configured defaults and bounds
    pub fn resolve(&self, config: &BatchConfig) -> Result<BatchProcessingOptions> {
        let chunk_size = self.chunk_size.unwrap_or(config.default_chunk_size);
        if chunk_size == 0 || chunk_size > config.max_chunk_size {
            return Err(GatewayError::validation(format!(
                "chunkSize must be between 1 and {}",
                config.max_chunk_size
            )));
        }

        let max_concurrency = self
            .max_concurrency
            .unwrap_or(config.default_max_concurrency);
        if max_concurrency == 0 || max_concurrency > config.concurrency_limit {
            return Err(GatewayError::validation(format!(
                "maxConcurrency must be between 1 and {}",
                config.concurrency_limit
            )));
        }

        let policy = FailurePolicy::from_continue_on_error(self.continue_on_error.unwrap_or(true));
        BatchProcessingOptions::new(chunk_size, max_concurrency, policy)
    }
}

/// An input item that did not make it, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedItem<T> {
    pub item: T,
    pub error: String,
}

/// Counters over a whole call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Aggregated outcome of a batch call.
///
/// `S` is what a success yields, `T` the input item echoed back on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOperationResult<S, T> {
    pub successful: Vec<S>,
    pub failed: Vec<FailedItem<T>>,
    pub stats: BatchStats,
}

impl<S, T> Default for BatchOperationResult<S, T> {
    fn default() -> Self {
        Self {
            successful: Vec::new(),
            failed: Vec::new(),
            stats: BatchStats::default(),
        }
    }
}

impl<S, T> BatchOperationResult<S, T> {
    /// Zero-stats result for an empty input
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the call had input and nothing failed
    pub fn is_success(&self) -> bool {
        self.stats.total > 0 && self.stats.failed == 0
    }

    pub(crate) fn succeed(&mut self, value: S) {
        self.successful.push(value);
        self.stats.successful += 1;
        self.stats.total += 1;
    }

    pub(crate) fn fail(&mut self, item: T, error: impl Into<String>) {
        self.failed.push(FailedItem {
            item,
            error: error.into(),
        });
        self.stats.failed += 1;
        self.stats.total += 1;
    }

    pub(crate) fn absorb(&mut self, other: BatchOperationResult<S, T>) {
        self.stats.total += other.stats.total;
        self.stats.successful += other.stats.successful;
        self.stats.failed += other.stats.failed;
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }
}
