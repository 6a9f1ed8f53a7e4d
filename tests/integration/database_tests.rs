//! Database integration tests
//!
//! Exercises the SeaORM store adapter against a migrated in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{TestDatabase, UserFactory};
    use catalog_gateway::core::models::{UserPatch, UserPredicate, UserRole, UserStatus};
    use catalog_gateway::core::traits::UserStore;
    use serde_json::json;
    use uuid::Uuid;

    fn patch(value: serde_json::Value) -> UserPatch {
        serde_json::from_value(value).unwrap()
    }

    /// Test basic database connection and health check
    #[tokio::test]
    async fn test_database_health_check() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().health_check().await);
    }

    /// Migrations can be applied twice
    #[tokio::test]
    async fn test_database_migration_is_idempotent() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().migrate().await);
    }

    #[tokio::test]
    async fn test_bulk_insert_and_key_lookups() {
        let db = TestDatabase::new().await;
        let users = UserFactory::stored_many(3);

        assert_ok!(db.db().bulk_insert(&users).await);

        let email = users[0].email.clone();
        assert!(assert_ok!(db.db().exists_by_key(&email).await));
        assert!(!assert_ok!(db.db().exists_by_key("nobody@example.com").await));

        let found = assert_ok!(db.db().find_by_key(&email).await).unwrap();
        assert_eq!(found.id(), users[0].id());
        assert_eq!(found.role, UserRole::User);
        assert_eq!(found.status, UserStatus::Active);
        assert_eq!(found.password_hash, users[0].password_hash);
        assert_eq!(assert_ok!(db.db().count_active_users().await), 3);
    }

    #[tokio::test]
    async fn test_bulk_insert_is_all_or_nothing_on_unique_email() {
        let db = TestDatabase::new().await;
        let first = UserFactory::stored();
        assert_ok!(db.db().bulk_insert(&[first.clone()]).await);

        let mut clash = UserFactory::stored();
        clash.email = first.email.clone();
        let fresh = UserFactory::stored();

        assert!(db.db().bulk_insert(&[fresh.clone(), clash]).await.is_err());
        assert!(!assert_ok!(db.db().exists_by_key(&fresh.email).await));
    }

    #[tokio::test]
    async fn test_bulk_update_by_predicate() {
        let db = TestDatabase::new().await;
        let users = UserFactory::stored_many(3);
        assert_ok!(db.db().bulk_insert(&users).await);

        let affected = assert_ok!(
            db.db()
                .bulk_update_by_predicate(
                    &UserPredicate::IdEq(users[0].id()),
                    &patch(json!({"displayName": "Renamed", "role": "manager"})),
                )
                .await
        );
        assert_eq!(affected, 1);

        let updated = assert_ok!(db.db().find_user_by_id(users[0].id()).await).unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Renamed"));
        assert_eq!(updated.role, UserRole::Manager);
        assert_eq!(updated.metadata.version, 2);

        let ids = users.iter().map(|u| u.id()).chain([Uuid::new_v4()]).collect();
        let affected = assert_ok!(
            db.db()
                .bulk_update_by_predicate(
                    &UserPredicate::IdIn(ids),
                    &patch(json!({"status": "suspended"})),
                )
                .await
        );
        assert_eq!(affected, 3);

        let missing = assert_ok!(
            db.db()
                .bulk_update_by_predicate(
                    &UserPredicate::IdEq(Uuid::new_v4()),
                    &patch(json!({"status": "active"})),
                )
                .await
        );
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_soft_delete_reports_affected_ids() {
        let db = TestDatabase::new().await;
        let users = UserFactory::stored_many(2);
        assert_ok!(db.db().bulk_insert(&users).await);

        let unknown = Uuid::new_v4();
        let deleted = assert_ok!(
            db.db()
                .bulk_soft_delete(&[users[0].id(), unknown])
                .await
        );
        assert_eq!(deleted, vec![users[0].id()]);

        // Already deleted rows are not affected again
        let again = assert_ok!(db.db().bulk_soft_delete(&[users[0].id()]).await);
        assert!(again.is_empty());

        let stored = assert_ok!(db.db().find_user_by_id(users[0].id()).await).unwrap();
        assert!(stored.is_deleted());
        assert_eq!(stored.status, UserStatus::Deleted);

        // Soft-deleted rows are invisible to reads and predicates but keep their key
        let fetched = assert_ok!(
            db.db()
                .fetch_by_id_set(&[users[0].id(), users[1].id()])
                .await
        );
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id(), users[1].id());

        let affected = assert_ok!(
            db.db()
                .bulk_update_by_predicate(
                    &UserPredicate::IdEq(users[0].id()),
                    &patch(json!({"displayName": "ghost"})),
                )
                .await
        );
        assert_eq!(affected, 0);
        assert!(assert_ok!(db.db().exists_by_key(&users[0].email).await));
    }

    #[tokio::test]
    async fn test_list_page_walks_active_records_by_id() {
        let db = TestDatabase::new().await;
        let users = UserFactory::stored_many(5);
        assert_ok!(db.db().bulk_insert(&users).await);
        assert_ok!(db.db().bulk_soft_delete(&[users[2].id()]).await);

        let mut seen = Vec::new();
        let mut after = None;
        loop {
            let page = assert_ok!(db.db().list_page(after, 2).await);
            seen.extend(page.items.iter().map(|u| u.id()));
            match page.next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        let mut expected: Vec<Uuid> = users
            .iter()
            .map(|u| u.id())
            .filter(|id| *id != users[2].id())
            .collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}
