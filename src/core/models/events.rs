//! Audit and security events raised by batch operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted after a batch operation touches a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    /// Affected record; `None` when a policy violation names an id that did not parse
    pub user_id: Option<Uuid>,
    /// What happened
    #[serde(flatten)]
    pub kind: UserEventKind,
    /// When the engine observed it
    pub occurred_at: DateTime<Utc>,
}

/// Event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UserEventKind {
    /// Record inserted
    Created { email: String },
    /// Record patched
    Updated { fields: Vec<String> },
    /// Record soft-deleted
    Deleted,
    /// Update attempted to write a credential field
    PolicyViolation { field: String, reason: String },
}

impl UserEvent {
    fn now(user_id: Option<Uuid>, kind: UserEventKind) -> Self {
        Self {
            user_id,
            kind,
            occurred_at: Utc::now(),
        }
    }

    pub fn created(user_id: Uuid, email: impl Into<String>) -> Self {
        Self::now(
            Some(user_id),
            UserEventKind::Created {
                email: email.into(),
            },
        )
    }

    pub fn updated(user_id: Uuid, fields: &[&str]) -> Self {
        Self::now(
            Some(user_id),
            UserEventKind::Updated {
                fields: fields.iter().map(|f| f.to_string()).collect(),
            },
        )
    }

    pub fn deleted(user_id: Uuid) -> Self {
        Self::now(Some(user_id), UserEventKind::Deleted)
    }

    pub fn policy_violation(
        user_id: Option<Uuid>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::now(
            user_id,
            UserEventKind::PolicyViolation {
                field: field.into(),
                reason: reason.into(),
            },
        )
    }

    /// Security events are routed separately from the audit trail
    pub fn is_security(&self) -> bool {
        matches!(self.kind, UserEventKind::PolicyViolation { .. })
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self.kind {
            UserEventKind::Created { .. } => "user.created",
            UserEventKind::Updated { .. } => "user.updated",
            UserEventKind::Deleted => "user.deleted",
            UserEventKind::PolicyViolation { .. } => "user.policy_violation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        let id = Uuid::new_v4();
        assert!(!UserEvent::created(id, "a@example.com").is_security());
        assert!(!UserEvent::deleted(id).is_security());
        assert!(UserEvent::policy_violation(Some(id), "password", "forbidden").is_security());
        assert_eq!(UserEvent::updated(id, &["email"]).name(), "user.updated");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = UserEvent::updated(Uuid::new_v4(), &["email", "role"]);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "updated");
        assert_eq!(value["fields"][1], "role");
    }
}
