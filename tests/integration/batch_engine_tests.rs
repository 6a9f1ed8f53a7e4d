//! Batch engine integration tests
//!
//! Runs the engine against the SQLite store with the in-process cache.

#[cfg(test)]
mod tests {
    use crate::common::{EngineHarness, TestDatabase, UserFactory};
    use catalog_gateway::core::batch::{
        ALREADY_EXISTS, BatchProcessingOptions, CREDENTIAL_POLICY_VIOLATION, DUPLICATE_IN_REQUEST,
        FailurePolicy, NOT_FOUND,
    };
    use catalog_gateway::core::models::{UserEventKind, UserUpdate};
    use catalog_gateway::core::traits::{RecordCache, UserStore};
    use catalog_gateway::storage::memory::MemoryUserStore;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn options(chunk_size: usize) -> BatchProcessingOptions {
        BatchProcessingOptions::new(chunk_size, 2, FailurePolicy::IsolateChunk).unwrap()
    }

    #[tokio::test]
    async fn test_full_lifecycle_on_sqlite() {
        let db = TestDatabase::new().await;
        let harness = EngineHarness::new(db.db_arc());
        let engine = &harness.engine;

        let mut items: Vec<_> = (0..7).map(|_| UserFactory::new_user()).collect();
        items.push(UserFactory::with_email(&items[0].email.to_uppercase()));

        let created = engine.create_users(&items, &options(3)).await;
        assert_eq!(created.stats.total, 8);
        assert_eq!(created.stats.successful, 7);
        assert_eq!(created.failed[0].error, DUPLICATE_IN_REQUEST);

        let ids: Vec<String> = created.successful.iter().map(|u| u.id().to_string()).collect();
        let found = engine.lookup_users(&ids, &options(3)).await;
        assert_eq!(found.len(), 7);

        let target = created.successful[0].id();
        let updates = vec![UserUpdate::new(
            target.to_string(),
            serde_json::from_value(json!({"displayName": "Updated"})).unwrap(),
        )];
        let updated = engine.update_users(&updates, &options(3)).await;
        assert!(updated.is_success());

        // The update invalidated the cached copy, so the lookup refetches
        assert!(harness.cache.multi_get(&[target]).await.unwrap().is_empty());
        let found = engine.lookup_users(&[target.to_string()], &options(3)).await;
        assert_eq!(found[&target].display_name.as_deref(), Some("Updated"));

        let to_delete = vec![ids[1].clone(), ids[2].clone(), Uuid::new_v4().to_string()];
        let deleted = engine.soft_delete_users(&to_delete, &options(10)).await;
        assert_eq!(deleted.stats.successful, 2);
        assert_eq!(deleted.failed[0].error, NOT_FOUND);

        let found = engine.lookup_users(&ids, &options(3)).await;
        assert_eq!(found.len(), 5);

        let recreate = engine
            .create_users(&[items[1].clone()], &options(3))
            .await;
        assert_eq!(recreate.failed[0].error, ALREADY_EXISTS);

        let report = engine.warm_cache(&options(2)).await.unwrap();
        assert_eq!(report.records, 5);
        assert_eq!(report.pages, 3);
    }

    #[tokio::test]
    async fn test_abort_all_matches_isolate_when_nothing_fails() {
        let harness = EngineHarness::new(Arc::new(MemoryUserStore::new()));
        let items: Vec<_> = (0..5).map(|_| UserFactory::new_user()).collect();
        let opts = BatchProcessingOptions::new(2, 1, FailurePolicy::AbortAll).unwrap();

        let result = harness.engine.create_users(&items, &opts).await;
        assert!(result.is_success());
        assert_eq!(result.successful.len(), 5);

        // Output keeps input order across chunks
        let emails: Vec<&str> = result.successful.iter().map(|u| u.email.as_str()).collect();
        let expected: Vec<String> = items.iter().map(|i| i.natural_key()).collect();
        assert_eq!(emails, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_credential_patch_emits_security_event_only() {
        let db = TestDatabase::new().await;
        let harness = EngineHarness::new(db.db_arc());
        let user = UserFactory::stored();
        harness
            .engine
            .store()
            .bulk_insert(&[user.clone()])
            .await
            .unwrap();

        let updates = vec![UserUpdate::new(
            user.id().to_string(),
            serde_json::from_value(json!({"password": "new-secret", "displayName": "x"}))
                .unwrap(),
        )];
        let result = harness
            .engine
            .update_users(&updates, &BatchProcessingOptions::default())
            .await;

        assert_eq!(result.failed[0].error, CREDENTIAL_POLICY_VIOLATION);
        let events = harness.events.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            UserEventKind::PolicyViolation { .. }
        ));

        let stored = db.db().find_user_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(stored.display_name, user.display_name);
        assert_eq!(stored.metadata.version, 1);
    }
}
