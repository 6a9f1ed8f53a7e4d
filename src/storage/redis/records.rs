//! Record cache over Redis
//!
//! Values are JSON documents keyed by `<prefix><id>`. Password hashes never reach Redis.

use super::pool::RedisPool;
use crate::core::models::User;
use crate::core::traits::RecordCache;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Shared record cache with a fixed TTL
#[derive(Debug, Clone)]
pub struct RedisRecordCache {
    pool: Arc<RedisPool>,
    ttl: u64,
}

impl RedisRecordCache {
    pub fn new(pool: Arc<RedisPool>, ttl: u64) -> Self {
        Self { pool, ttl }
    }

    pub fn pool(&self) -> &Arc<RedisPool> {
        &self.pool
    }

    pub(crate) fn key(&self, id: Uuid) -> String {
        format!("{}{}", self.pool.key_prefix(), id)
    }
}

#[async_trait]
impl RecordCache for RedisRecordCache {
    async fn multi_get(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>> {
        let keys: Vec<String> = ids.iter().map(|id| self.key(*id)).collect();
        let values = self.pool.mget(&keys).await?;

        let mut hits = HashMap::with_capacity(ids.len());
        for (id, value) in ids.iter().zip(values) {
            let Some(value) = value else { continue };
            // A corrupt entry is a miss; the store is authoritative
            match serde_json::from_str::<User>(&value) {
                Ok(user) => {
                    hits.insert(*id, user);
                }
                Err(e) => warn!(user_id = %id, error = %e, "Discarding undecodable cache entry"),
            }
        }
        Ok(hits)
    }

    async fn multi_set(&self, users: &[User]) -> Result<()> {
        let pairs = users
            .iter()
            .map(|user| Ok((self.key(user.id()), serde_json::to_string(user)?)))
            .collect::<Result<Vec<_>>>()?;
        self.pool.mset(&pairs, Some(self.ttl)).await
    }

    async fn invalidate(&self, id: Uuid) -> Result<()> {
        self.pool.delete(&self.key(id)).await
    }

    fn backend(&self) -> &'static str {
        if self.pool.is_noop() { "noop" } else { "redis" }
    }
}
