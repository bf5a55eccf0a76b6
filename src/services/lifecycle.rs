//! User lifecycle service - transactional user deletion.
//!
//! A user row can only go away once every case they own has a new
//! home: either handed to a substitute admin or cascade-deleted along
//! with its children. Both disposals and the user delete itself commit
//! in a single transaction, so a mid-sequence failure never strands a
//! case pointing at a missing owner.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Actor;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ObjectStore, UnitOfWork};
use crate::with_transaction;

/// Outcome of a user deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDeletion {
    /// Cases handed to the substitute admin
    pub reassigned: u64,
    /// Cases removed by cascade (including the PERSONAL case when a
    /// substitute took the rest)
    pub removed: u64,
    /// The admin who inherited the cases, if any
    pub substitute: Option<Uuid>,
    pub message: String,
}

/// User lifecycle service trait for dependency injection.
#[async_trait]
pub trait UserLifecycleService: Send + Sync {
    /// Delete a user and dispose of every case they own.
    ///
    /// Ordered guards: self-deletion is refused, a missing target is
    /// not found, and removing the last admin is refused with no
    /// writes performed.
    async fn delete_user(&self, actor: Actor, user_id: Uuid) -> AppResult<UserDeletion>;
}

/// Concrete implementation of UserLifecycleService.
pub struct LifecycleManager<U: UnitOfWork> {
    uow: Arc<U>,
    store: Arc<dyn ObjectStore>,
}

impl<U: UnitOfWork> LifecycleManager<U> {
    pub fn new(uow: Arc<U>, store: Arc<dyn ObjectStore>) -> Self {
        Self { uow, store }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserLifecycleService for LifecycleManager<U> {
    async fn delete_user(&self, actor: Actor, user_id: Uuid) -> AppResult<UserDeletion> {
        if actor.id == user_id {
            return Err(AppError::Forbidden);
        }

        // The transaction also yields the file URLs orphaned by any
        // cascade so the blobs can be cleaned up after commit
        let (outcome, orphaned_urls) = with_transaction!(self.uow, |ctx| {
            let target = ctx.users().find_by_id(user_id).await?.ok_or_not_found()?;

            if target.role.is_admin() && ctx.users().count_admins().await? <= 1 {
                return Err(AppError::invariant("Cannot delete the last admin user"));
            }

            let substitute = ctx.users().find_substitute_admin(user_id).await?;

            let (outcome, urls) = match substitute {
                Some(admin) => {
                    // Regular cases move to the substitute; the
                    // PERSONAL case cannot follow (the substitute may
                    // already have one) so it is removed instead
                    // Their own uploads cascade with the user row, so
                    // those blobs are collected before the reassign
                    // moves the cases out from under the owner query
                    let mut urls = ctx.uploads().file_urls_by_uploader(user_id).await?;

                    let reassigned = ctx
                        .cases()
                        .reassign_all_except_personal(user_id, admin.id)
                        .await?;
                    urls.extend(ctx.uploads().file_urls_for_owner(user_id).await?);
                    let removed = ctx.cases().delete_all_owned_by(user_id).await?;

                    let outcome = UserDeletion {
                        reassigned,
                        removed,
                        substitute: Some(admin.id),
                        message: format!(
                            "User deleted; {} case(s) reassigned to {}",
                            reassigned, admin.name
                        ),
                    };
                    (outcome, urls)
                }
                None => {
                    let mut urls = ctx.uploads().file_urls_by_uploader(user_id).await?;
                    urls.extend(ctx.uploads().file_urls_for_owner(user_id).await?);
                    let removed = ctx.cases().delete_all_owned_by(user_id).await?;

                    let outcome = UserDeletion {
                        reassigned: 0,
                        removed,
                        substitute: None,
                        message: format!("User deleted; {} case(s) removed", removed),
                    };
                    (outcome, urls)
                }
            };

            ctx.users().delete(user_id).await?;

            Ok((outcome, urls))
        })?;

        // Post-commit blob cleanup is best-effort; the rows are gone
        // either way. The two collection queries can overlap on the
        // user's own personal files.
        let orphaned_urls: std::collections::BTreeSet<String> =
            orphaned_urls.into_iter().collect();
        for url in &orphaned_urls {
            if let Err(e) = self.store.remove(url).await {
                tracing::warn!("Failed to remove orphaned file {url}: {e}");
            }
        }

        Ok(outcome)
    }
}
