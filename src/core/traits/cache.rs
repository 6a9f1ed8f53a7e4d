//! Record cache adapter
//!
//! Keys are record ids; values are whole records. Expiry belongs to the adapter.

use crate::core::models::User;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Cache-aside store for user records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordCache: Send + Sync {
    /// Cached records for the ids that hit; misses are simply absent
    async fn multi_get(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>>;

    /// Write all records
    async fn multi_set(&self, users: &[User]) -> Result<()>;

    /// Drop the entry for one id
    async fn invalidate(&self, id: Uuid) -> Result<()>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}
