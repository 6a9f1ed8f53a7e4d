//! Batch update

use super::{BatchEngine, ChunkOutcome, Planned};
use crate::core::batch::types::{
    BatchOperationResult, BatchProcessingOptions, CONFLICT, DUPLICATE_IN_REQUEST,
    INVALID_ID_FORMAT, NOT_FOUND,
};
use crate::core::batch::validation::{ValidationResult, parse_id};
use crate::core::models::{UserEvent, UserPatch, UserPredicate, UserUpdate};
use crate::utils::error::Result;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

enum UpdateVerdict {
    Applied,
    Rejected(&'static str),
}

impl BatchEngine {
    /// Apply partial updates, one predicate update per item.
    ///
    /// Successful items yield their id. The cache entry of every updated record is invalidated.
    pub async fn update_users(
        &self,
        updates: &[UserUpdate],
        options: &BatchProcessingOptions,
    ) -> BatchOperationResult<Uuid, UserUpdate> {
        if updates.is_empty() {
            debug!("Batch update called with no items");
            return BatchOperationResult::empty();
        }

        let entries = self.plan_update(updates);
        let result = self
            .drive("update", &entries, options, |chunk| self.update_chunk(chunk))
            .await;

        info!(
            total = result.stats.total,
            successful = result.stats.successful,
            failed = result.stats.failed,
            "Batch update finished"
        );
        result
    }

    /// Patch validation first (credential policy wins), then id format, then first-wins on
    /// both the id and any new email
    fn plan_update<'a>(&self, updates: &'a [UserUpdate]) -> Vec<Planned<'a, UserUpdate, Uuid>> {
        let mut seen_ids = HashSet::with_capacity(updates.len());
        let mut seen_emails = HashSet::new();

        updates
            .iter()
            .map(|item| {
                let id = parse_id(&item.id);

                if let ValidationResult::Invalid(reason) = self.patch_validator.validate(&item.data) {
                    if let Some(field) = item.data.credential_field() {
                        warn!(target: "security", user_id = %item.id, field, "Credential update rejected");
                        self.emit(UserEvent::policy_violation(id, field, reason.clone()));
                    }
                    return Planned {
                        item,
                        plan: Err(reason),
                    };
                }

                let plan = match id {
                    None => Err(INVALID_ID_FORMAT.to_string()),
                    Some(id) if !seen_ids.insert(id) => Err(DUPLICATE_IN_REQUEST.to_string()),
                    Some(id) => {
                        let email_claimed = item
                            .data
                            .natural_key()
                            .is_some_and(|email| !seen_emails.insert(email));
                        if email_claimed {
                            Err(DUPLICATE_IN_REQUEST.to_string())
                        } else {
                            Ok(id)
                        }
                    }
                };
                Planned { item, plan }
            })
            .collect()
    }

    async fn update_chunk(
        &self,
        chunk: &[Planned<'_, UserUpdate, Uuid>],
    ) -> ChunkOutcome<Uuid, UserUpdate> {
        let mut outcome = ChunkOutcome::default();

        for entry in chunk {
            let id = match &entry.plan {
                Ok(id) => *id,
                Err(reason) => {
                    outcome.result.fail(entry.item.clone(), reason.clone());
                    continue;
                }
            };

            // Updates are committed one by one, so a store error only fails what is left.
            if let Some(error) = &outcome.store_error {
                outcome.result.fail(entry.item.clone(), error.clone());
                continue;
            }

            match self.apply_update(id, &entry.item.data).await {
                Ok(UpdateVerdict::Applied) => {
                    self.invalidate("update", id).await;
                    self.emit(UserEvent::updated(id, &entry.item.data.changed_fields()));
                    outcome.result.succeed(id);
                }
                Ok(UpdateVerdict::Rejected(reason)) => {
                    outcome.result.fail(entry.item.clone(), reason);
                }
                Err(e) => {
                    warn!(user_id = %id, error = %e, "Update failed");
                    let error = e.to_string();
                    outcome.result.fail(entry.item.clone(), error.clone());
                    outcome.store_error = Some(error);
                }
            }
        }

        outcome
    }

    async fn apply_update(&self, id: Uuid, patch: &UserPatch) -> Result<UpdateVerdict> {
        if let Some(email) = patch.natural_key() {
            if let Some(owner) = self.store.find_by_key(&email).await? {
                if owner.id() != id {
                    return Ok(UpdateVerdict::Rejected(CONFLICT));
                }
            }
        }

        let affected = self
            .store
            .bulk_update_by_predicate(&UserPredicate::IdEq(id), patch)
            .await?;

        if affected == 0 {
            Ok(UpdateVerdict::Rejected(NOT_FOUND))
        } else {
            Ok(UpdateVerdict::Applied)
        }
    }
}
