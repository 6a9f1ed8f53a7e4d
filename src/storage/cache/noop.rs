//! Cache that stores nothing

use crate::core::models::User;
use crate::core::traits::RecordCache;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Every read misses and every write is dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl RecordCache for NoopCache {
    async fn multi_get(&self, _ids: &[Uuid]) -> Result<HashMap<Uuid, User>> {
        Ok(HashMap::new())
    }

    async fn multi_set(&self, _users: &[User]) -> Result<()> {
        Ok(())
    }

    async fn invalidate(&self, _id: Uuid) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "noop"
    }
}
