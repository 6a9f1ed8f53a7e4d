//! Per-item structural validation
//!
//! Validators are pure: no I/O, no shared state. One item's verdict never depends on another.

use super::types::{CREDENTIAL_POLICY_VIOLATION, EMPTY_UPDATE};
use crate::core::models::{NewUser, UserPatch};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,50}$").expect("Invalid username regex"));

const MIN_PASSWORD_LEN: usize = 8;

/// Verdict for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Convert into a `Result` carrying the rejection reason
    pub fn into_result(self) -> std::result::Result<(), String> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

/// Structural check applied to each item before any I/O
pub trait Validator<T>: Send + Sync {
    fn validate(&self, item: &T) -> ValidationResult;
}

/// Structural id validity
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn check_username(username: &str) -> Option<String> {
    if USERNAME_REGEX.is_match(username.trim()) {
        None
    } else {
        Some("invalid username: 3-50 characters of letters, digits, '_', '.' or '-'".to_string())
    }
}

fn check_email(email: &str) -> Option<String> {
    if EMAIL_REGEX.is_match(email.trim()) {
        None
    } else {
        Some("invalid email format".to_string())
    }
}

/// Default rules for new accounts
#[derive(Debug, Clone, Copy, Default)]
pub struct NewUserValidator;

impl Validator<NewUser> for NewUserValidator {
    fn validate(&self, item: &NewUser) -> ValidationResult {
        if let Some(reason) = check_username(&item.username) {
            return ValidationResult::Invalid(reason);
        }
        if let Some(reason) = check_email(&item.email) {
            return ValidationResult::Invalid(reason);
        }
        if item.password.chars().count() < MIN_PASSWORD_LEN {
            return ValidationResult::Invalid(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        ValidationResult::Valid
    }
}

/// Default rules for partial updates.
///
/// Order matters: the credential policy wins over every other reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPatchValidator;

impl Validator<UserPatch> for UserPatchValidator {
    fn validate(&self, item: &UserPatch) -> ValidationResult {
        if item.touches_credentials() {
            return ValidationResult::Invalid(CREDENTIAL_POLICY_VIOLATION.to_string());
        }
        if let Some(key) = item.unrecognized.keys().next() {
            return ValidationResult::Invalid(format!("unrecognized field: {}", key));
        }
        if item.is_empty() {
            return ValidationResult::Invalid(EMPTY_UPDATE.to_string());
        }
        if let Some(reason) = item.username.as_deref().and_then(check_username) {
            return ValidationResult::Invalid(reason);
        }
        if let Some(reason) = item.email.as_deref().and_then(check_email) {
            return ValidationResult::Invalid(reason);
        }
        ValidationResult::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> UserPatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_user_rules() {
        let validator = NewUserValidator;
        assert!(
            validator
                .validate(&NewUser::new("alice", "alice@example.com", "long-enough"))
                .is_valid()
        );
        assert!(
            !validator
                .validate(&NewUser::new("al", "alice@example.com", "long-enough"))
                .is_valid()
        );
        assert!(
            !validator
                .validate(&NewUser::new("alice", "not-an-email", "long-enough"))
                .is_valid()
        );
        assert_eq!(
            validator.validate(&NewUser::new("alice", "alice@example.com", "short")),
            ValidationResult::Invalid("password must be at least 8 characters".into())
        );
    }

    #[test]
    fn test_credential_policy_checked_first() {
        let verdict = UserPatchValidator.validate(&patch(json!({
            "password": "x",
            "email": "broken",
            "nickname": "n"
        })));
        assert_eq!(
            verdict,
            ValidationResult::Invalid("policy violation: credential updates forbidden".into())
        );

        let verdict = UserPatchValidator.validate(&patch(json!({"password_hash": "abc"})));
        assert_eq!(verdict.into_result().unwrap_err(), CREDENTIAL_POLICY_VIOLATION);
    }

    #[test]
    fn test_patch_unrecognized_and_empty() {
        assert_eq!(
            UserPatchValidator.validate(&patch(json!({"nickname": "n"}))),
            ValidationResult::Invalid("unrecognized field: nickname".into())
        );
        assert_eq!(
            UserPatchValidator.validate(&patch(json!({}))),
            ValidationResult::Invalid("empty update".into())
        );
    }

    #[test]
    fn test_patch_field_rules() {
        assert!(
            UserPatchValidator
                .validate(&patch(json!({"email": "new@example.org", "role": "admin"})))
                .is_valid()
        );
        assert!(
            !UserPatchValidator
                .validate(&patch(json!({"email": "nope"})))
                .is_valid()
        );
        assert!(
            !UserPatchValidator
                .validate(&patch(json!({"username": "has space"})))
                .is_valid()
        );
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&format!(" {} ", id)), Some(id));
        assert_eq!(parse_id("not-a-uuid"), None);
        assert_eq!(parse_id(""), None);
    }
}
