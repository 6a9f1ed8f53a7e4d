//! Persistent store adapter

use crate::core::models::{Page, User, UserPatch, UserPredicate};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Set-based persistence of user records.
///
/// Soft-deleted records are never fetched, listed or matched by a predicate. Their natural key
/// stays reserved, so the key lookups still see them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether any record owns the normalized natural key
    async fn exists_by_key(&self, email: &str) -> Result<bool>;

    /// Record owning the normalized natural key
    async fn find_by_key(&self, email: &str) -> Result<Option<User>>;

    /// Insert all records in one statement; all or nothing
    async fn bulk_insert(&self, users: &[User]) -> Result<()>;

    /// Apply a patch to every matching record, returning the affected row count
    async fn bulk_update_by_predicate(
        &self,
        predicate: &UserPredicate,
        patch: &UserPatch,
    ) -> Result<u64>;

    /// Soft-delete the active records among `ids`, returning the ids actually deleted
    async fn bulk_soft_delete(&self, ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Active records among `ids`
    async fn fetch_by_id_set(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Active records with id greater than `after`, ascending by id
    async fn list_page(&self, after: Option<Uuid>, limit: usize) -> Result<Page<User>>;

    /// Liveness probe
    async fn health_check(&self) -> Result<()>;
}
