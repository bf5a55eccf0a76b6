//! Personal file service - per-user file storage backed by a
//! synthetic PERSONAL case.
//!
//! Every user gets at most one PERSONAL case, provisioned lazily on
//! first use. The case is a storage anchor, not a court case; it
//! participates in ownership transfers and deletions like any other
//! case except where self-transfer excludes it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{is_allowed_file_type, BUCKET_PERSONAL_FILES, MAX_UPLOAD_SIZE};
use crate::domain::{Case, Upload};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::storage::object_path;
use crate::infra::{ObjectStore, UnitOfWork};

/// Personal file service trait for dependency injection.
#[async_trait]
pub trait PersonalFileService: Send + Sync {
    /// Get the user's PERSONAL case, provisioning it if absent.
    ///
    /// Idempotent: repeated and concurrent calls converge on the same
    /// case row.
    async fn get_or_create_personal_case(&self, user_id: Uuid) -> AppResult<Case>;

    /// Store a file against the user's PERSONAL case
    async fn upload_personal_file(
        &self,
        user_id: Uuid,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<Upload>;

    /// List the user's personal files, newest first
    async fn list_personal_files(&self, user_id: Uuid) -> AppResult<Vec<Upload>>;
}

/// Concrete implementation of PersonalFileService.
pub struct PersonalFileManager<U: UnitOfWork> {
    uow: Arc<U>,
    store: Arc<dyn ObjectStore>,
}

impl<U: UnitOfWork> PersonalFileManager<U> {
    pub fn new(uow: Arc<U>, store: Arc<dyn ObjectStore>) -> Self {
        Self { uow, store }
    }
}

#[async_trait]
impl<U: UnitOfWork> PersonalFileService for PersonalFileManager<U> {
    async fn get_or_create_personal_case(&self, user_id: Uuid) -> AppResult<Case> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;
        self.uow.cases().get_or_create_personal(user_id).await
    }

    async fn upload_personal_file(
        &self,
        user_id: Uuid,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<Upload> {
        if !is_allowed_file_type(&content_type) {
            return Err(AppError::validation(format!(
                "File type not allowed: {content_type}"
            )));
        }
        if bytes.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::validation("File exceeds the 10 MB size limit"));
        }

        let personal = self.get_or_create_personal_case(user_id).await?;

        // Blob goes out before the row insert; the row is the source
        // of truth, so a failed insert leaves only a stray blob
        let path = object_path(user_id, &file_name);
        let file_url = self
            .store
            .upload(BUCKET_PERSONAL_FILES, &path, &content_type, bytes)
            .await?;

        let upload = Upload {
            id: Uuid::new_v4(),
            case_id: Some(personal.id),
            user_id,
            file_name,
            file_url: file_url.clone(),
            file_type: content_type,
            created_at: Utc::now(),
        };

        match self.uow.uploads().insert(upload).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                if let Err(cleanup) = self.store.remove(&file_url).await {
                    tracing::warn!("Failed to clean up blob after insert error: {cleanup}");
                }
                Err(e)
            }
        }
    }

    async fn list_personal_files(&self, user_id: Uuid) -> AppResult<Vec<Upload>> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;

        match self.uow.cases().find_personal(user_id).await? {
            Some(personal) => self.uow.uploads().list_for_case(personal.id).await,
            // No personal case yet means no files; provisioning is
            // deferred to the first upload
            None => Ok(Vec::new()),
        }
    }
}
