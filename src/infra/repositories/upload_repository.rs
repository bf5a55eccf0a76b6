//! Upload repository - queries against the uploads table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::upload;
use crate::domain::Upload;
use crate::errors::{AppError, AppResult};

/// Upload repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Find upload by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Upload>>;

    /// Insert a new upload row
    async fn insert(&self, upload: Upload) -> AppResult<Upload>;

    /// List uploads attached to a case, newest first
    async fn list_for_case(&self, case_id: Uuid) -> AppResult<Vec<Upload>>;

    /// Delete an upload row by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Connection-backed implementation of UploadRepository
pub struct UploadStore {
    db: DatabaseConnection,
}

impl UploadStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UploadRepository for UploadStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Upload>> {
        let result = upload::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Upload::from))
    }

    async fn insert(&self, upload: Upload) -> AppResult<Upload> {
        let active = upload::ActiveModel {
            id: Set(upload.id),
            case_id: Set(upload.case_id),
            user_id: Set(upload.user_id),
            file_name: Set(upload.file_name),
            file_url: Set(upload.file_url),
            file_type: Set(upload.file_type),
            created_at: Set(upload.created_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Upload::from(model))
    }

    async fn list_for_case(&self, case_id: Uuid) -> AppResult<Vec<Upload>> {
        use sea_orm::QueryOrder;

        let models = upload::Entity::find()
            .filter(upload::Column::CaseId.eq(case_id))
            .order_by_desc(upload::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Upload::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = upload::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
