//! Test fixtures and data factories

use catalog_gateway::core::audit::RecordingEmitter;
use catalog_gateway::core::batch::BatchEngine;
use catalog_gateway::core::models::{NewUser, User};
use catalog_gateway::core::traits::{RecordCache, UserStore};
use catalog_gateway::storage::cache::MokaRecordCache;
use catalog_gateway::utils::crypto::CredentialHasher;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Factory for user records
pub struct UserFactory;

impl UserFactory {
    /// Candidate with a unique username and email
    pub fn new_user() -> NewUser {
        let suffix = &Uuid::new_v4().simple().to_string()[..8];
        NewUser::new(
            format!("user_{}", suffix),
            format!("test-{}@example.com", suffix),
            "password123",
        )
    }

    /// Candidate with a specific email
    pub fn with_email(email: &str) -> NewUser {
        let mut user = Self::new_user();
        user.email = email.to_string();
        user
    }

    /// Stored record with a placeholder hash
    pub fn stored() -> User {
        Self::new_user().into_user("$argon2id$v=19$placeholder".to_string())
    }

    /// Several stored records
    pub fn stored_many(count: usize) -> Vec<User> {
        (0..count).map(|_| Self::stored()).collect()
    }
}

/// Engine over a given store with an in-process cache and a recording event sink
pub struct EngineHarness {
    pub engine: BatchEngine,
    pub cache: Arc<MokaRecordCache>,
    pub events: RecordingEmitter,
}

impl EngineHarness {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        let cache = Arc::new(MokaRecordCache::new(10_000, Duration::from_secs(300)));
        let events = RecordingEmitter::new();
        let engine = BatchEngine::new(
            store,
            cache.clone() as Arc<dyn RecordCache>,
            Arc::new(events.clone()),
        )
        .with_hasher(CredentialHasher::with_params(8, 1, 1).expect("valid argon2 params"));

        Self {
            engine,
            cache,
            events,
        }
    }
}
