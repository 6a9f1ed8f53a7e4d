//! User records and the inputs of batch create/update

mod patch;
mod types;

#[cfg(test)]
mod tests;

pub use patch::{CREDENTIAL_FIELDS, RECOGNIZED_FIELDS, UserPatch, UserPredicate, UserUpdate};
pub use types::{NewUser, User, UserRole, UserStatus, normalize_email};
