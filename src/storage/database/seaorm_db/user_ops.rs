use crate::core::models::User;
use crate::utils::error::{GatewayError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, user};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find user by ID, soft-deleted records included
    pub async fn find_user_by_id(&self, user_id: uuid::Uuid) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let user_model = entities::User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Find user by normalized email, soft-deleted records included
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        debug!("Finding user by email");

        let user_model = entities::User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Count active users
    pub async fn count_active_users(&self) -> Result<u64> {
        entities::User::find()
            .filter(user::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(GatewayError::Database)
    }
}
