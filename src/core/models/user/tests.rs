//! Tests for user models

use super::*;
use serde_json::json;

#[test]
fn test_new_user_normalizes_natural_key() {
    let candidate = NewUser::new("alice", "  Alice@Example.COM ", "secret-password");
    assert_eq!(candidate.natural_key(), "alice@example.com");

    let user = candidate.into_user("$argon2id$stub".to_string());
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, UserRole::User);
    assert!(user.is_active());
    assert!(!user.is_deleted());
}

#[test]
fn test_new_user_debug_and_json_hide_password() {
    let candidate = NewUser::new("bob", "bob@example.com", "hunter2-hunter2");
    assert!(!format!("{:?}", candidate).contains("hunter2"));

    let json = serde_json::to_string(&candidate).unwrap();
    assert!(!json.contains("hunter2"));
}

#[test]
fn test_user_serialization_strips_password_hash() {
    let user = NewUser::new("carol", "carol@example.com", "pw-pw-pw-pw").into_user("hash".into());
    let value = serde_json::to_value(&user).unwrap();
    assert!(value.get("password_hash").is_none());
    assert_eq!(value["email"], "carol@example.com");
    assert_eq!(value["id"], json!(user.id()));
}

#[test]
fn test_patch_captures_unknown_and_credential_keys() {
    let patch: UserPatch = serde_json::from_value(json!({
        "displayName": "Dee",
        "password": "x",
        "favourite_colour": "green"
    }))
    .unwrap();

    assert_eq!(patch.display_name.as_deref(), Some("Dee"));
    assert!(patch.touches_credentials());
    assert_eq!(patch.credential_field(), Some("password"));
    assert!(patch.unrecognized.contains_key("favourite_colour"));
    assert!(!patch.is_empty());
}

#[test]
fn test_patch_null_credential_still_counts() {
    let patch: UserPatch = serde_json::from_value(json!({
        "password_hash": null,
        "role": "admin"
    }))
    .unwrap();

    assert!(patch.touches_credentials());
    assert_eq!(patch.credential_field(), Some("password_hash"));

    let absent: UserPatch = serde_json::from_value(json!({"role": "admin"})).unwrap();
    assert!(!absent.touches_credentials());
}

#[test]
fn test_empty_patch() {
    let patch: UserPatch = serde_json::from_value(json!({})).unwrap();
    assert!(patch.is_empty());
    assert!(patch.changed_fields().is_empty());
}

#[test]
fn test_patch_apply_to() {
    let mut user = NewUser::new("erin", "erin@example.com", "pw-pw-pw-pw").into_user("h".into());
    let patch = UserPatch {
        email: Some("ERIN@New.example.com".to_string()),
        role: Some(UserRole::Admin),
        ..Default::default()
    };

    assert_eq!(patch.natural_key().as_deref(), Some("erin@new.example.com"));
    assert_eq!(patch.changed_fields(), vec!["email", "role"]);

    patch.apply_to(&mut user);
    assert_eq!(user.email, "erin@new.example.com");
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(user.metadata.version, 2);
}

#[test]
fn test_predicate_skips_deleted_records() {
    let mut user = NewUser::new("finn", "finn@example.com", "pw-pw-pw-pw").into_user("h".into());
    let predicate = UserPredicate::IdEq(user.id());
    assert!(predicate.matches(&user));

    user.mark_deleted(chrono::Utc::now());
    assert!(!predicate.matches(&user));
    assert_eq!(user.status, UserStatus::Deleted);
}

#[test]
fn test_role_and_status_round_trip_strings() {
    assert_eq!("api_user".parse::<UserRole>().unwrap(), UserRole::ApiUser);
    assert_eq!(UserRole::SuperAdmin.to_string(), "super_admin");
    assert_eq!("pending".parse::<UserStatus>().unwrap(), UserStatus::Pending);
    assert!("bogus".parse::<UserStatus>().is_err());
}
