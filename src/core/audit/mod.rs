//! Audit and security event emitters
//!
//! `AuditEmitter` hands events to a bounded channel drained by a background task, so the batch
//! paths never wait on the audit sink. A full or closed channel drops the event and reports it.

use crate::core::models::{UserEvent, UserEventKind};
use crate::core::traits::EventEmitter;
use crate::utils::error::{GatewayError, Result};
use crate::utils::truncate_string;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{info, warn};

const MAX_REASON_LEN: usize = 200;

/// Channel-backed emitter that writes events to the `audit` and `security` tracing targets
pub struct AuditEmitter {
    sender: mpsc::Sender<UserEvent>,
    dropped: AtomicU64,
}

impl AuditEmitter {
    /// Create the emitter and spawn its drain task on the current runtime
    pub fn new(buffer_size: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<UserEvent>(buffer_size.max(1));

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                Self::record(&event);
            }
        });

        Self {
            sender,
            dropped: AtomicU64::new(0),
        }
    }

    /// Events dropped because the channel was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn record(event: &UserEvent) {
        let user_id = event.user_id.map(|id| id.to_string());
        match &event.kind {
            UserEventKind::Created { email } => info!(
                target: "audit",
                event = event.name(),
                user_id = user_id.as_deref(),
                email = email.as_str(),
                occurred_at = %event.occurred_at,
                "User created"
            ),
            UserEventKind::Updated { fields } => info!(
                target: "audit",
                event = event.name(),
                user_id = user_id.as_deref(),
                fields = ?fields,
                occurred_at = %event.occurred_at,
                "User updated"
            ),
            UserEventKind::Deleted => info!(
                target: "audit",
                event = event.name(),
                user_id = user_id.as_deref(),
                occurred_at = %event.occurred_at,
                "User soft-deleted"
            ),
            UserEventKind::PolicyViolation { field, reason } => warn!(
                target: "security",
                event = event.name(),
                user_id = user_id.as_deref(),
                field = field.as_str(),
                reason = %truncate_string(reason, MAX_REASON_LEN),
                occurred_at = %event.occurred_at,
                "Policy violation"
            ),
        }
    }
}

impl EventEmitter for AuditEmitter {
    fn emit(&self, event: UserEvent) -> Result<()> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(GatewayError::emission(format!(
                    "audit buffer full, {} dropped",
                    event.name()
                )))
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(GatewayError::emission(format!(
                    "audit channel closed, {} dropped",
                    event.name()
                )))
            }
        }
    }
}

/// Emitter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

impl EventEmitter for NoopEmitter {
    fn emit(&self, _event: UserEvent) -> Result<()> {
        Ok(())
    }
}

/// Emitter that keeps every event in memory, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<UserEvent>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far
    pub fn events(&self) -> Vec<UserEvent> {
        self.events.lock().clone()
    }

    /// Number of security events emitted so far
    pub fn security_events(&self) -> usize {
        self.events.lock().iter().filter(|e| e.is_security()).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit(&self, event: UserEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_audit_emitter_accepts_events() {
        let emitter = AuditEmitter::new(8);
        assert!(emitter.emit(UserEvent::deleted(Uuid::new_v4())).is_ok());
        assert_eq!(emitter.dropped(), 0);
    }

    #[tokio::test]
    async fn test_audit_emitter_reports_full_buffer() {
        let emitter = AuditEmitter::new(1);
        // The drain task cannot run until this test yields, so the second send overflows.
        emitter.emit(UserEvent::deleted(Uuid::new_v4())).unwrap();
        let err = emitter
            .emit(UserEvent::deleted(Uuid::new_v4()))
            .unwrap_err();

        assert!(matches!(err, GatewayError::Emission(_)));
        assert_eq!(emitter.dropped(), 1);
    }

    #[test]
    fn test_recording_emitter() {
        let emitter = RecordingEmitter::new();
        let id = Uuid::new_v4();
        emitter.emit(UserEvent::created(id, "a@example.com")).unwrap();
        emitter
            .emit(UserEvent::policy_violation(Some(id), "password", "forbidden"))
            .unwrap();

        assert_eq!(emitter.events().len(), 2);
        assert_eq!(emitter.security_events(), 1);

        emitter.clear();
        assert!(emitter.events().is_empty());
    }
}
