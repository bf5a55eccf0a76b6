//! User directory service - read projections over users.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::UserWithInfo;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// User directory service trait for dependency injection.
#[async_trait]
pub trait UserDirectoryService: Send + Sync {
    /// List every user with their personal info attached where present
    async fn list_users_with_info(&self) -> AppResult<Vec<UserWithInfo>>;
}

/// Concrete implementation of UserDirectoryService.
pub struct UserDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserDirectoryService for UserDirectory<U> {
    async fn list_users_with_info(&self) -> AppResult<Vec<UserWithInfo>> {
        self.uow.users().list_with_info().await
    }
}
