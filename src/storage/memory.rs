//! In-memory user store
//!
//! Used when the database is disabled and as the fake store in tests. Records are kept in id
//! order so keyset pagination matches the SQL adapter.

use crate::core::models::{Page, User, UserPatch, UserPredicate};
use crate::core::traits::UserStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use uuid::Uuid;

/// User store backed by an ordered map
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `users`
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        {
            let mut map = store.users.write();
            for user in users {
                map.insert(user.id(), user);
            }
        }
        store
    }

    /// Record by id, soft-deleted ones included
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    /// Number of records, soft-deleted ones included
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_key(&self, email: &str) -> Result<bool> {
        Ok(self.users.read().values().any(|user| user.email == email))
    }

    async fn find_by_key(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn bulk_insert(&self, users: &[User]) -> Result<()> {
        let mut map = self.users.write();

        let mut emails: HashSet<&str> = map.values().map(|user| user.email.as_str()).collect();
        for user in users {
            if map.contains_key(&user.id()) {
                return Err(GatewayError::conflict(format!("duplicate id {}", user.id())));
            }
            if !emails.insert(user.email.as_str()) {
                return Err(GatewayError::conflict("unique constraint violated: users.email"));
            }
        }

        for user in users {
            map.insert(user.id(), user.clone());
        }
        Ok(())
    }

    async fn bulk_update_by_predicate(
        &self,
        predicate: &UserPredicate,
        patch: &UserPatch,
    ) -> Result<u64> {
        let mut map = self.users.write();

        if let Some(email) = patch.natural_key() {
            let matched = map.values().filter(|user| predicate.matches(user)).count();
            let taken = map
                .values()
                .any(|user| user.email == email && !predicate.matches(user));
            if taken || matched > 1 {
                return Err(GatewayError::conflict("unique constraint violated: users.email"));
            }
        }

        let mut affected = 0;
        for user in map.values_mut().filter(|user| predicate.matches(user)) {
            patch.apply_to(user);
            affected += 1;
        }
        Ok(affected)
    }

    async fn bulk_soft_delete(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let mut map = self.users.write();
        let now = chrono::Utc::now();

        let mut deleted = Vec::new();
        for id in ids {
            if let Some(user) = map.get_mut(id) {
                if !user.is_deleted() {
                    user.mark_deleted(now);
                    deleted.push(*id);
                }
            }
        }
        Ok(deleted)
    }

    async fn fetch_by_id_set(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let map = self.users.read();
        Ok(ids
            .iter()
            .filter_map(|id| map.get(id))
            .filter(|user| !user.is_deleted())
            .cloned()
            .collect())
    }

    async fn list_page(&self, after: Option<Uuid>, limit: usize) -> Result<Page<User>> {
        if limit == 0 {
            return Ok(Page::empty());
        }

        let map = self.users.read();
        let lower = match after {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };
        let items: Vec<User> = map
            .range((lower, Bound::Unbounded))
            .map(|(_, user)| user)
            .filter(|user| !user.is_deleted())
            .take(limit)
            .cloned()
            .collect();

        Ok(Page::from_items(items, limit, User::id))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NewUser;

    fn user(name: &str) -> User {
        NewUser::new(name, format!("{}@example.com", name), "password-1").into_user("h".into())
    }

    #[tokio::test]
    async fn test_bulk_insert_is_all_or_nothing() {
        let store = MemoryUserStore::with_users([user("alice")]);
        let result = store.bulk_insert(&[user("bob"), user("alice")]).await;

        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert!(!store.exists_by_key("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_soft_delete_reports_affected_ids() {
        let alice = user("alice");
        let bob = user("bob");
        let ghost = Uuid::new_v4();
        let store = MemoryUserStore::with_users([alice.clone(), bob.clone()]);

        let deleted = store
            .bulk_soft_delete(&[alice.id(), ghost])
            .await
            .unwrap();
        assert_eq!(deleted, vec![alice.id()]);

        // Second delete of the same id affects nothing.
        assert!(store.bulk_soft_delete(&[alice.id()]).await.unwrap().is_empty());

        let fetched = store.fetch_by_id_set(&[alice.id(), bob.id()]).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id(), bob.id());

        // The key stays reserved.
        assert!(store.exists_by_key("alice@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_by_predicate_counts_rows() {
        let alice = user("alice");
        let store = MemoryUserStore::with_users([alice.clone()]);
        let patch = UserPatch {
            display_name: Some("Alice".into()),
            ..Default::default()
        };

        let affected = store
            .bulk_update_by_predicate(&UserPredicate::IdEq(alice.id()), &patch)
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.get(alice.id()).unwrap().display_name.as_deref(), Some("Alice"));

        let affected = store
            .bulk_update_by_predicate(&UserPredicate::IdEq(Uuid::new_v4()), &patch)
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let alice = user("alice");
        let bob = user("bob");
        let store = MemoryUserStore::with_users([alice.clone(), bob.clone()]);
        let patch = UserPatch {
            email: Some("bob@example.com".into()),
            ..Default::default()
        };

        let result = store
            .bulk_update_by_predicate(&UserPredicate::IdEq(alice.id()), &patch)
            .await;
        assert!(matches!(result, Err(GatewayError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_page_walks_in_id_order() {
        let users: Vec<User> = (0..5).map(|i| user(&format!("user{}", i))).collect();
        let store = MemoryUserStore::with_users(users.clone());
        store.bulk_soft_delete(&[users[0].id()]).await.unwrap();

        let mut seen = Vec::new();
        let mut after = None;
        loop {
            let page = store.list_page(after, 2).await.unwrap();
            seen.extend(page.items.iter().map(User::id));
            match page.next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        let mut expected: Vec<Uuid> = users[1..].iter().map(User::id).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}
