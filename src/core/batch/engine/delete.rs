//! Batch soft-delete

use super::{BatchEngine, ChunkOutcome, Planned};
use crate::core::batch::types::{
    BatchOperationResult, BatchProcessingOptions, DUPLICATE_IN_REQUEST, FailurePolicy,
    INVALID_ID_FORMAT, NOT_FOUND,
};
use crate::core::batch::validation::parse_id;
use crate::core::models::UserEvent;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl BatchEngine {
    /// Soft-delete users by id, one set-based call per chunk.
    ///
    /// Every input id gets an acknowledgment: malformed ids fail with `invalid id format`,
    /// ids with no active record fail with `not found`.
    pub async fn soft_delete_users(
        &self,
        ids: &[String],
        options: &BatchProcessingOptions,
    ) -> BatchOperationResult<Uuid, String> {
        if ids.is_empty() {
            debug!("Batch soft-delete called with no ids");
            return BatchOperationResult::empty();
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let entries: Vec<Planned<'_, String, Uuid>> = ids
            .iter()
            .map(|item| {
                let plan = match parse_id(item) {
                    None => Err(INVALID_ID_FORMAT.to_string()),
                    Some(id) if !seen.insert(id) => Err(DUPLICATE_IN_REQUEST.to_string()),
                    Some(id) => Ok(id),
                };
                Planned { item, plan }
            })
            .collect();

        let policy = options.failure_policy();
        let result = self
            .drive("delete", &entries, options, |chunk| {
                self.delete_chunk(chunk, policy)
            })
            .await;

        info!(
            total = result.stats.total,
            successful = result.stats.successful,
            failed = result.stats.failed,
            "Batch soft-delete finished"
        );
        result
    }

    async fn delete_chunk(
        &self,
        chunk: &[Planned<'_, String, Uuid>],
        policy: FailurePolicy,
    ) -> ChunkOutcome<Uuid, String> {
        let mut outcome = ChunkOutcome::default();
        let mut targets: Vec<(&String, Uuid)> = Vec::with_capacity(chunk.len());

        for entry in chunk {
            match &entry.plan {
                Ok(id) => targets.push((entry.item, *id)),
                Err(reason) => outcome.result.fail(entry.item.clone(), reason.clone()),
            }
        }

        if targets.is_empty() {
            return outcome;
        }

        let ids: Vec<Uuid> = targets.iter().map(|(_, id)| *id).collect();
        let deleted = match self.store.bulk_soft_delete(&ids).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(ids = ids.len(), error = %e, "Bulk soft-delete failed");
                let error = e.to_string();
                for (item, _) in targets {
                    outcome.result.fail(item.clone(), error.clone());
                }
                outcome.store_error = Some(error);
                return outcome;
            }
        };

        let mut confirmed: Vec<Uuid> = Vec::with_capacity(targets.len());

        if deleted.is_empty() && policy == FailurePolicy::IsolateChunk {
            debug!(ids = ids.len(), "Bulk soft-delete affected no rows, retrying per id");
            for (item, id) in targets {
                match self.store.bulk_soft_delete(&[id]).await {
                    Ok(affected) if affected.contains(&id) => confirmed.push(id),
                    Ok(_) => outcome.result.fail(item.clone(), NOT_FOUND),
                    Err(e) => {
                        warn!(user_id = %id, error = %e, "Soft-delete failed");
                        outcome.result.fail(item.clone(), e.to_string());
                    }
                }
            }
        } else {
            let deleted: HashSet<Uuid> = deleted.into_iter().collect();
            for (item, id) in targets {
                if deleted.contains(&id) {
                    confirmed.push(id);
                } else {
                    outcome.result.fail(item.clone(), NOT_FOUND);
                }
            }
        }

        for id in confirmed {
            self.invalidate("delete", id).await;
            self.emit(UserEvent::deleted(id));
            outcome.result.succeed(id);
        }

        outcome
    }
}
