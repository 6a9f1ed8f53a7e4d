use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::models::{Metadata, User, UserRole, UserStatus};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Normalized email address (unique, stays reserved after soft-delete)
    #[sea_orm(unique)]
    pub email: String,

    /// Password hash
    pub password_hash: String,

    /// Display name (optional)
    pub display_name: Option<String>,

    /// User role
    pub role: String,

    /// User status
    pub status: String,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,

    /// Soft-delete timestamp
    pub deleted_at: Option<DateTimeWithTimeZone>,

    /// Version for optimistic locking
    pub version: i32,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion methods between SeaORM model and our domain model
impl Model {
    /// Convert SeaORM model to domain user model
    pub fn to_domain_user(&self) -> User {
        let metadata = Metadata {
            id: self.id,
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
            version: self.version as i64,
        };

        User {
            metadata,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role.parse().unwrap_or(UserRole::User),
            status: self.status.parse().unwrap_or(UserStatus::Pending),
            deleted_at: self.deleted_at.map(|dt| dt.naive_utc().and_utc()),
        }
    }

    /// Convert domain user model to SeaORM active model
    pub fn from_domain_user(user: &User) -> ActiveModel {
        ActiveModel {
            id: Set(user.metadata.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            display_name: Set(user.display_name.clone()),
            role: Set(user.role.to_string()),
            status: Set(user.status.to_string()),
            created_at: Set(user.metadata.created_at.into()),
            updated_at: Set(user.metadata.updated_at.into()),
            deleted_at: Set(user.deleted_at.map(|dt| dt.into())),
            version: Set(user.metadata.version as i32),
        }
    }
}
