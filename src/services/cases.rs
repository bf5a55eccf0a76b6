//! Case service - case and upload deletion with storage cleanup.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Actor;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ObjectStore, UnitOfWork};
use crate::with_transaction;

/// Case service trait for dependency injection.
#[async_trait]
pub trait CaseService: Send + Sync {
    /// Delete a case and everything attached to it.
    ///
    /// Allowed for the owner or any admin. Child rows cascade in the
    /// same transaction; remote files are removed after commit.
    async fn delete_case(&self, actor: Actor, case_id: Uuid) -> AppResult<()>;

    /// Delete a single upload row and its remote file.
    ///
    /// Allowed for the uploader, the owner of the containing case, or
    /// any admin.
    async fn delete_upload(&self, actor: Actor, upload_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CaseService.
pub struct CaseManager<U: UnitOfWork> {
    uow: Arc<U>,
    store: Arc<dyn ObjectStore>,
}

impl<U: UnitOfWork> CaseManager<U> {
    pub fn new(uow: Arc<U>, store: Arc<dyn ObjectStore>) -> Self {
        Self { uow, store }
    }
}

#[async_trait]
impl<U: UnitOfWork> CaseService for CaseManager<U> {
    async fn delete_case(&self, actor: Actor, case_id: Uuid) -> AppResult<()> {
        let urls = with_transaction!(self.uow, |ctx| {
            let case = ctx.cases().find_by_id(case_id).await?.ok_or_not_found()?;

            if !actor.is_admin() && case.user_id != actor.id {
                return Err(AppError::Forbidden);
            }

            let urls = ctx.uploads().file_urls_for_case(case_id).await?;
            ctx.cases().delete(case_id).await?;
            Ok(urls)
        })?;

        // The case is gone; a blob that refuses to die is logged and
        // left behind
        for url in &urls {
            if let Err(e) = self.store.remove(url).await {
                tracing::warn!("Failed to remove file for deleted case {case_id}: {e}");
            }
        }

        Ok(())
    }

    async fn delete_upload(&self, actor: Actor, upload_id: Uuid) -> AppResult<()> {
        let upload = self
            .uow
            .uploads()
            .find_by_id(upload_id)
            .await?
            .ok_or_not_found()?;

        let authorized = actor.is_admin() || upload.user_id == actor.id || {
            match upload.case_id {
                Some(case_id) => self
                    .uow
                    .cases()
                    .find_by_id(case_id)
                    .await?
                    .is_some_and(|case| case.user_id == actor.id),
                None => false,
            }
        };
        if !authorized {
            return Err(AppError::Forbidden);
        }

        // Remote removal first so a storage outage surfaces in the
        // logs, but the row delete proceeds regardless
        if let Err(e) = self.store.remove(&upload.file_url).await {
            tracing::warn!("Failed to remove file for upload {upload_id}: {e}");
        }

        self.uow.uploads().delete(upload_id).await
    }
}
