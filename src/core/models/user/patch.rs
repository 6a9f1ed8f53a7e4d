//! Partial updates over a closed set of user fields

use super::types::{User, UserRole, UserStatus, normalize_email};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Keys a patch may carry
pub const RECOGNIZED_FIELDS: &[&str] = &["username", "email", "display_name", "role", "status"];

/// Credential keys; owned by the credential subsystem and always rejected
pub const CREDENTIAL_FIELDS: &[&str] = &["password", "password_hash"];

/// Partial update of a user record.
///
/// Unknown keys are kept in `unrecognized` so validation can name them instead of
/// silently dropping them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        alias = "displayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// `Some` whenever the key is present, `null` included
    #[serde(default, deserialize_with = "key_present", skip_serializing)]
    pub password: Option<serde_json::Value>,
    #[serde(
        default,
        alias = "passwordHash",
        deserialize_with = "key_present",
        skip_serializing
    )]
    pub password_hash: Option<serde_json::Value>,
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

fn key_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl UserPatch {
    /// No recognized, credential or unknown key present
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
            && !self.touches_credentials()
            && self.unrecognized.is_empty()
    }

    /// Whether the patch tries to write a credential field
    pub fn touches_credentials(&self) -> bool {
        self.password.is_some() || self.password_hash.is_some()
    }

    /// First credential key present, if any
    pub fn credential_field(&self) -> Option<&'static str> {
        if self.password.is_some() {
            Some("password")
        } else if self.password_hash.is_some() {
            Some("password_hash")
        } else {
            None
        }
    }

    /// Normalized email the patch would write
    pub fn natural_key(&self) -> Option<String> {
        self.email.as_deref().map(normalize_email)
    }

    /// Recognized fields present, in declaration order
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.username.is_some() {
            fields.push("username");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.display_name.is_some() {
            fields.push("display_name");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        fields
    }

    /// Apply the recognized fields to a record and bump its version
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.trim().to_string();
        }
        if let Some(email) = self.natural_key() {
            user.email = email;
        }
        if let Some(display_name) = &self.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        user.metadata.touch();
    }
}

/// One entry of a batch update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    /// Target id as sent by the caller
    pub id: String,
    /// Fields to change
    pub data: UserPatch,
}

impl UserUpdate {
    pub fn new(id: impl Into<String>, data: UserPatch) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Row selection for set-based updates. Soft-deleted rows never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPredicate {
    /// A single id
    IdEq(Uuid),
    /// Any id of the set
    IdIn(Vec<Uuid>),
}

impl UserPredicate {
    /// Whether an in-memory record is selected
    pub fn matches(&self, user: &User) -> bool {
        if user.is_deleted() {
            return false;
        }
        match self {
            UserPredicate::IdEq(id) => user.id() == *id,
            UserPredicate::IdIn(ids) => ids.contains(&user.id()),
        }
    }
}
