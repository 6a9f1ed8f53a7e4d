//! Batch create

use super::{BatchEngine, ChunkOutcome, Planned};
use crate::core::batch::types::{
    ALREADY_EXISTS, BatchOperationResult, BatchProcessingOptions, DUPLICATE_IN_REQUEST,
};
use crate::core::models::{NewUser, User, UserEvent};
use crate::utils::error::{GatewayError, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

impl BatchEngine {
    /// Create users in chunks, one bulk insert per chunk.
    ///
    /// Never returns an error: store failures become per-item failures according to the
    /// failure policy.
    pub async fn create_users(
        &self,
        items: &[NewUser],
        options: &BatchProcessingOptions,
    ) -> BatchOperationResult<User, NewUser> {
        if items.is_empty() {
            debug!("Batch create called with no items");
            return BatchOperationResult::empty();
        }

        let entries = self.plan_create(items);
        let result = self
            .drive("create", &entries, options, |chunk| self.create_chunk(chunk))
            .await;

        info!(
            total = result.stats.total,
            successful = result.stats.successful,
            failed = result.stats.failed,
            "Batch create finished"
        );
        result
    }

    /// Validate every item and apply the first-wins rule on the normalized email
    fn plan_create<'a>(&self, items: &'a [NewUser]) -> Vec<Planned<'a, NewUser, String>> {
        let mut seen = HashSet::with_capacity(items.len());
        items
            .iter()
            .map(|item| {
                let plan = self
                    .new_user_validator
                    .validate(item)
                    .into_result()
                    .and_then(|()| {
                        let key = item.natural_key();
                        if seen.insert(key.clone()) {
                            Ok(key)
                        } else {
                            Err(DUPLICATE_IN_REQUEST.to_string())
                        }
                    });
                Planned { item, plan }
            })
            .collect()
    }

    async fn create_chunk(
        &self,
        chunk: &[Planned<'_, NewUser, String>],
    ) -> ChunkOutcome<User, NewUser> {
        let mut outcome = ChunkOutcome::default();
        let mut pending: Vec<&NewUser> = Vec::with_capacity(chunk.len());
        let mut chunk_error: Option<String> = None;

        for entry in chunk {
            let key = match &entry.plan {
                Ok(key) => key,
                Err(reason) => {
                    outcome.result.fail(entry.item.clone(), reason.clone());
                    continue;
                }
            };

            if let Some(error) = &chunk_error {
                outcome.result.fail(entry.item.clone(), error.clone());
                continue;
            }

            match self.store.exists_by_key(key).await {
                Ok(true) => outcome.result.fail(entry.item.clone(), ALREADY_EXISTS),
                Ok(false) => pending.push(entry.item),
                Err(e) => {
                    warn!(error = %e, "Existence check failed");
                    let error = e.to_string();
                    outcome.result.fail(entry.item.clone(), error.clone());
                    chunk_error = Some(error);
                }
            }
        }

        if let Some(error) = chunk_error {
            for item in pending {
                outcome.result.fail(item.clone(), error.clone());
            }
            outcome.store_error = Some(error);
            return outcome;
        }

        if pending.is_empty() {
            return outcome;
        }

        let hashes = match self.hash_passwords(&pending).await {
            Ok(hashes) => hashes,
            Err(e) => {
                let error = e.to_string();
                for item in pending {
                    outcome.result.fail(item.clone(), error.clone());
                }
                return outcome;
            }
        };

        let mut staged: Vec<(&NewUser, User)> = Vec::with_capacity(pending.len());
        for (item, hash) in pending.into_iter().zip(hashes) {
            match hash {
                Ok(hash) => staged.push((item, item.clone().into_user(hash))),
                Err(e) => outcome.result.fail(item.clone(), e.to_string()),
            }
        }

        if staged.is_empty() {
            return outcome;
        }

        let users: Vec<User> = staged.iter().map(|(_, user)| user.clone()).collect();
        match self.store.bulk_insert(&users).await {
            Ok(()) => {
                debug!(records = users.len(), "Chunk inserted");
                self.cache_records("create", &users).await;
                for user in &users {
                    self.emit(UserEvent::created(user.id(), user.email.clone()));
                }
                for user in users {
                    outcome.result.succeed(user);
                }
            }
            Err(e) => {
                warn!(records = users.len(), error = %e, "Bulk insert failed");
                let error = e.to_string();
                for (item, _) in staged {
                    outcome.result.fail(item.clone(), error.clone());
                }
                outcome.store_error = Some(error);
            }
        }

        outcome
    }

    /// Hash the chunk's passwords off the async workers
    async fn hash_passwords(&self, items: &[&NewUser]) -> Result<Vec<Result<String>>> {
        let hasher = self.hasher.clone();
        let passwords: Vec<String> = items.iter().map(|item| item.password.clone()).collect();

        tokio::task::spawn_blocking(move || {
            passwords
                .iter()
                .map(|password| hasher.hash(password))
                .collect()
        })
        .await
        .map_err(|e| GatewayError::internal(format!("Password hashing task failed: {}", e)))
    }
}
