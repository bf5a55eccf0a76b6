//! Upload domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A file uploaded against a case.
///
/// `user_id` records the uploader, which is independent of the
/// containing case's current owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    pub id: Uuid,
    pub case_id: Option<Uuid>,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

/// Upload response payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub case_id: Option<Uuid>,
    /// Uploader (not necessarily the case owner)
    pub user_id: Uuid,
    #[schema(example = "contract.pdf")]
    pub file_name: String,
    pub file_url: String,
    #[schema(example = "application/pdf")]
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<Upload> for UploadResponse {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            case_id: upload.case_id,
            user_id: upload.user_id,
            file_name: upload.file_name,
            file_url: upload.file_url,
            file_type: upload.file_type,
            created_at: upload.created_at,
        }
    }
}
