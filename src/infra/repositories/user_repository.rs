//! User repository - queries against the users table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::{personal_info, user};
use crate::domain::{User, UserWithInfo};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn insert(&self, user: User) -> AppResult<User>;

    /// List all users joined with their optional personal info,
    /// ordered by name
    async fn list_with_info(&self) -> AppResult<Vec<UserWithInfo>>;
}

/// Connection-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let active = user::ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            name: Set(user.name),
            role: Set(user.role.to_string()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn list_with_info(&self) -> AppResult<Vec<UserWithInfo>> {
        use sea_orm::QueryOrder;

        // Left join: personal info is optional
        let rows: Vec<(user::Model, Option<personal_info::Model>)> = user::Entity::find()
            .find_also_related(personal_info::Entity)
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(u, info)| UserWithInfo {
                user: User::from(u).into(),
                personal_info: info.map(Into::into),
            })
            .collect())
    }
}
