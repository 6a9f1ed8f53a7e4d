use crate::core::models::{Page, User, UserPatch, UserPredicate, UserStatus};
use crate::core::traits::UserStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, user};
use super::types::SeaOrmDatabase;

fn predicate_condition(predicate: &UserPredicate) -> Condition {
    let matched = match predicate {
        UserPredicate::IdEq(id) => user::Column::Id.eq(*id),
        UserPredicate::IdIn(ids) => user::Column::Id.is_in(ids.iter().copied()),
    };
    Condition::all()
        .add(matched)
        .add(user::Column::DeletedAt.is_null())
}

fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

fn version_bump() -> SimpleExpr {
    Expr::col(user::Column::Version).add(1)
}

#[async_trait]
impl UserStore for SeaOrmDatabase {
    async fn exists_by_key(&self, email: &str) -> Result<bool> {
        let count = entities::User::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(GatewayError::Database)?;
        Ok(count > 0)
    }

    async fn find_by_key(&self, email: &str) -> Result<Option<User>> {
        self.find_user_by_email(email).await
    }

    async fn bulk_insert(&self, users: &[User]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }
        debug!("Inserting {} users", users.len());

        let models = users.iter().map(user::Model::from_domain_user);
        entities::User::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(GatewayError::Database)?;
        Ok(())
    }

    async fn bulk_update_by_predicate(
        &self,
        predicate: &UserPredicate,
        patch: &UserPatch,
    ) -> Result<u64> {
        let mut update = entities::User::update_many()
            .col_expr(user::Column::UpdatedAt, Expr::value(now()))
            .col_expr(user::Column::Version, version_bump());

        if let Some(username) = &patch.username {
            update = update.col_expr(
                user::Column::Username,
                Expr::value(username.trim().to_string()),
            );
        }
        if let Some(email) = patch.natural_key() {
            update = update.col_expr(user::Column::Email, Expr::value(email));
        }
        if let Some(display_name) = &patch.display_name {
            update = update.col_expr(user::Column::DisplayName, Expr::value(display_name.clone()));
        }
        if let Some(role) = patch.role {
            update = update.col_expr(user::Column::Role, Expr::value(role.to_string()));
        }
        if let Some(status) = patch.status {
            update = update.col_expr(user::Column::Status, Expr::value(status.to_string()));
        }

        let result = update
            .filter(predicate_condition(predicate))
            .exec(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        debug!("Update matched {} rows", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn bulk_soft_delete(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await.map_err(GatewayError::Database)?;

        let active: Vec<Uuid> = entities::User::find()
            .select_only()
            .column(user::Column::Id)
            .filter(predicate_condition(&UserPredicate::IdIn(ids.to_vec())))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(GatewayError::Database)?;

        if !active.is_empty() {
            let deleted_at = now();
            entities::User::update_many()
                .col_expr(user::Column::DeletedAt, Expr::value(Some(deleted_at)))
                .col_expr(user::Column::Status, Expr::value(UserStatus::Deleted.to_string()))
                .col_expr(user::Column::UpdatedAt, Expr::value(deleted_at))
                .col_expr(user::Column::Version, version_bump())
                .filter(user::Column::Id.is_in(active.iter().copied()))
                .exec(&txn)
                .await
                .map_err(GatewayError::Database)?;
        }

        txn.commit().await.map_err(GatewayError::Database)?;
        debug!("Soft-deleted {} of {} users", active.len(), ids.len());
        Ok(active)
    }

    async fn fetch_by_id_set(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::User::find()
            .filter(predicate_condition(&UserPredicate::IdIn(ids.to_vec())))
            .all(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        Ok(models.iter().map(user::Model::to_domain_user).collect())
    }

    async fn list_page(&self, after: Option<Uuid>, limit: usize) -> Result<Page<User>> {
        if limit == 0 {
            return Ok(Page::empty());
        }

        let mut query = entities::User::find().filter(user::Column::DeletedAt.is_null());
        if let Some(after) = after {
            query = query.filter(user::Column::Id.gt(after));
        }

        let models = query
            .order_by_asc(user::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        let users = models.iter().map(user::Model::to_domain_user).collect();
        Ok(Page::from_items(users, limit, User::id))
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}
