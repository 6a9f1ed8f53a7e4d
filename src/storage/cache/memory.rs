//! In-process record cache

use crate::config::CacheConfig;
use crate::core::models::User;
use crate::core::traits::RecordCache;
use crate::utils::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Record cache held in process memory, bounded by entry count and expiring after the TTL
#[derive(Clone)]
pub struct MokaRecordCache {
    entries: Cache<Uuid, User>,
}

impl std::fmt::Debug for MokaRecordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaRecordCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl MokaRecordCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        debug!(max_capacity, ttl_secs = ttl.as_secs(), "Creating in-process record cache");
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, Duration::from_secs(config.ttl))
    }

    /// Approximate number of live entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[async_trait]
impl RecordCache for MokaRecordCache {
    async fn multi_get(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>> {
        let mut hits = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.entries.get(id).await {
                hits.insert(*id, user);
            }
        }
        Ok(hits)
    }

    async fn multi_set(&self, users: &[User]) -> Result<()> {
        for user in users {
            self.entries.insert(user.id(), user.clone()).await;
        }
        Ok(())
    }

    async fn invalidate(&self, id: Uuid) -> Result<()> {
        self.entries.invalidate(&id).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
