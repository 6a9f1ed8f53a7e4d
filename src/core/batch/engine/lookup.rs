//! Batch lookup by id set (cache-aside)

use super::BatchEngine;
use crate::core::batch::processor::process_chunks_bounded;
use crate::core::batch::types::BatchProcessingOptions;
use crate::core::batch::validation::parse_id;
use crate::core::models::User;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

impl BatchEngine {
    /// Look up users by id.
    ///
    /// Best effort: malformed ids, missing records, soft-deleted records and ids lost to a
    /// failing store chunk are all simply absent from the map.
    pub async fn lookup_users(
        &self,
        ids: &[String],
        options: &BatchProcessingOptions,
    ) -> HashMap<Uuid, User> {
        let mut seen = HashSet::with_capacity(ids.len());
        let wanted: Vec<Uuid> = ids
            .iter()
            .filter_map(|raw| parse_id(raw))
            .filter(|id| seen.insert(*id))
            .collect();

        if wanted.is_empty() {
            debug!(requested = ids.len(), "Batch lookup has no well-formed ids");
            return HashMap::new();
        }

        let mut found = match self.cache.multi_get(&wanted).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(ids = wanted.len(), error = %e, "Cache read failed, treating as misses");
                HashMap::new()
            }
        };
        found.retain(|id, user| seen.contains(id) && !user.is_deleted());

        let missing: Vec<Uuid> = wanted
            .iter()
            .filter(|id| !found.contains_key(id))
            .copied()
            .collect();

        debug!(
            requested = wanted.len(),
            cache_hits = found.len(),
            misses = missing.len(),
            "Batch lookup cache pass"
        );

        if missing.is_empty() {
            return found;
        }

        let fetched = process_chunks_bounded(
            &missing,
            options.chunk_size(),
            options.max_concurrency(),
            |chunk| self.fetch_chunk(chunk),
        )
        .await;

        match fetched {
            Ok(chunks) => {
                for user in chunks.into_iter().flatten() {
                    found.insert(user.id(), user);
                }
            }
            Err(e) => warn!(error = %e, "Batch lookup store pass skipped"),
        }

        found
    }

    /// Fetch one chunk of misses and write them back to the cache
    async fn fetch_chunk(&self, chunk: &[Uuid]) -> Vec<User> {
        match self.store.fetch_by_id_set(chunk).await {
            Ok(users) => {
                let wanted: HashSet<Uuid> = chunk.iter().copied().collect();
                let users: Vec<User> = users
                    .into_iter()
                    .filter(|user| !user.is_deleted() && wanted.contains(&user.id()))
                    .collect();
                self.cache_records("lookup", &users).await;
                users
            }
            Err(e) => {
                warn!(ids = chunk.len(), error = %e, "Store fetch failed, ids treated as absent");
                Vec::new()
            }
        }
    }
}
