//! Batch operation engine
//!
//! Orchestrates validation, chunked store calls, cache-aside reads and event emission for the
//! create, lookup, update, soft-delete and cache warm-up call sites.

mod create;
mod delete;
mod lookup;
mod update;
mod warmup;

pub use warmup::WarmupReport;

use super::chunking::ChunkPlanner;
use super::processor::process_chunks_bounded;
use super::types::{BatchOperationResult, BatchProcessingOptions, FailurePolicy, processing_stopped};
use super::validation::{NewUserValidator, UserPatchValidator, Validator};
use crate::core::models::{NewUser, User, UserEvent, UserPatch};
use crate::core::traits::{EventEmitter, RecordCache, UserStore};
use crate::utils::crypto::CredentialHasher;
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// An input item with its pre-I/O verdict: the parsed key to work with, or the rejection reason
pub(crate) struct Planned<'a, T, P> {
    pub(crate) item: &'a T,
    pub(crate) plan: std::result::Result<P, String>,
}

/// What one chunk produced; `store_error` is set when a store call failed inside the chunk
pub(crate) struct ChunkOutcome<S, T> {
    pub(crate) result: BatchOperationResult<S, T>,
    pub(crate) store_error: Option<String>,
}

impl<S, T> Default for ChunkOutcome<S, T> {
    fn default() -> Self {
        Self {
            result: BatchOperationResult::empty(),
            store_error: None,
        }
    }
}

/// Batch engine over injected store, cache and event collaborators
#[derive(Clone)]
pub struct BatchEngine {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn RecordCache>,
    events: Arc<dyn EventEmitter>,
    hasher: CredentialHasher,
    new_user_validator: Arc<dyn Validator<NewUser>>,
    patch_validator: Arc<dyn Validator<UserPatch>>,
}

impl std::fmt::Debug for BatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEngine")
            .field("cache", &self.cache.backend())
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl BatchEngine {
    /// Create an engine with the default validation catalog and Argon2 parameters
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn RecordCache>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            store,
            cache,
            events,
            hasher: CredentialHasher::default(),
            new_user_validator: Arc::new(NewUserValidator),
            patch_validator: Arc::new(UserPatchValidator),
        }
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_new_user_validator(mut self, validator: Arc<dyn Validator<NewUser>>) -> Self {
        self.new_user_validator = validator;
        self
    }

    pub fn with_patch_validator(mut self, validator: Arc<dyn Validator<UserPatch>>) -> Self {
        self.patch_validator = validator;
        self
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<dyn RecordCache> {
        &self.cache
    }

    /// Store liveness
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }

    /// Run `process` over the planned entries under the call's failure policy.
    ///
    /// `IsolateChunk` runs up to `max_concurrency` chunks at once; `AbortAll` runs them one by
    /// one and fails every item of the remaining chunks after the first store error.
    pub(crate) async fn drive<'e, 'a, S, T, P, F, Fut>(
        &self,
        operation: &'static str,
        entries: &'e [Planned<'a, T, P>],
        options: &BatchProcessingOptions,
        process: F,
    ) -> BatchOperationResult<S, T>
    where
        T: Clone,
        F: Fn(&'e [Planned<'a, T, P>]) -> Fut,
        Fut: Future<Output = ChunkOutcome<S, T>>,
    {
        let mut result = BatchOperationResult::empty();
        let planner = match ChunkPlanner::new(options.chunk_size()) {
            Ok(planner) => planner,
            Err(e) => {
                fail_all(&mut result, entries, &e.to_string());
                return result;
            }
        };
        debug!(
            operation,
            items = entries.len(),
            chunk_size = planner.chunk_size(),
            chunks = planner.chunk_count(entries.len()),
            "Planned batch"
        );

        match options.failure_policy() {
            FailurePolicy::IsolateChunk => {
                match process_chunks_bounded(
                    entries,
                    planner.chunk_size(),
                    options.max_concurrency(),
                    &process,
                )
                .await
                {
                    Ok(outcomes) => {
                        for (index, outcome) in outcomes.into_iter().enumerate() {
                            if let Some(error) = &outcome.store_error {
                                warn!(operation, chunk = index, error = %error, "Chunk failed, continuing");
                            }
                            result.absorb(outcome.result);
                        }
                    }
                    Err(e) => fail_all(&mut result, entries, &e.to_string()),
                }
            }
            FailurePolicy::AbortAll => {
                let chunks = planner.plan(entries);

                for (index, chunk) in chunks.iter().copied().enumerate() {
                    let outcome = process(chunk).await;
                    result.absorb(outcome.result);

                    if let Some(error) = outcome.store_error {
                        let remaining = &chunks[index + 1..];
                        warn!(
                            operation,
                            chunk = index,
                            remaining_chunks = remaining.len(),
                            error = %error,
                            "Chunk failed, stopping"
                        );
                        let reason = processing_stopped(&error);
                        for entry in remaining.iter().flat_map(|chunk| chunk.iter()) {
                            result.fail(entry.item.clone(), reason.clone());
                        }
                        break;
                    }
                }
            }
        }

        result
    }

    /// Best-effort multi-set
    pub(crate) async fn cache_records(&self, operation: &'static str, users: &[User]) {
        if users.is_empty() {
            return;
        }
        if let Err(e) = self.cache.multi_set(users).await {
            warn!(operation, records = users.len(), error = %e, "Cache write failed");
        }
    }

    /// Best-effort invalidation
    pub(crate) async fn invalidate(&self, operation: &'static str, id: Uuid) {
        if let Err(e) = self.cache.invalidate(id).await {
            warn!(operation, user_id = %id, error = %e, "Cache invalidation failed");
        }
    }

    /// Fire-and-forget emission
    pub(crate) fn emit(&self, event: UserEvent) {
        let name = event.name();
        if let Err(e) = self.events.emit(event) {
            warn!(event = name, error = %e, "Event emission failed");
        }
    }
}

fn fail_all<S, T: Clone, P>(
    result: &mut BatchOperationResult<S, T>,
    entries: &[Planned<'_, T, P>],
    error: &str,
) {
    debug!(items = entries.len(), error, "Failing every item of the call");
    for entry in entries {
        result.fail(entry.item.clone(), error);
    }
}
