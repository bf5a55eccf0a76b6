//! Admin handlers - ownership transfers, user lifecycle, personal files.

use axum::{
    extract::{Extension, Multipart, Path, Query, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{UploadResponse, UserWithInfo};
use crate::errors::{AppError, AppResult};
use crate::services::{BulkTransfer, UserDeletion};
use crate::types::{ApiResponse, Created};

/// Bulk case reassignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkReassignRequest {
    /// User whose cases are handed over; omit to claim unassigned cases
    pub source_user_id: Option<Uuid>,
    /// User receiving the cases
    pub target_user_id: Uuid,
}

/// Query parameters for listing a user's personal files
#[derive(Debug, Deserialize)]
pub struct PersonalFilesQuery {
    pub user_id: Uuid,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/cases/reassign", post(bulk_reassign))
        .route("/users/:user_id", delete(delete_user))
        .route("/users/upload", post(upload_personal_file))
        .route("/personal-files", get(list_personal_files))
        .route("/users-with-info", get(users_with_info))
}

/// Reassign all of a user's cases to another user
#[utoipa::path(
    post,
    path = "/admin/cases/reassign",
    tag = "Admin",
    request_body = BulkReassignRequest,
    responses(
        (status = 200, description = "Cases reassigned", body = BulkTransfer),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Source or target user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn bulk_reassign(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<BulkReassignRequest>,
) -> AppResult<Json<ApiResponse<BulkTransfer>>> {
    require_admin(&user)?;

    let outcome = state
        .transfers
        .bulk_reassign(user.actor(), payload.source_user_id, payload.target_user_id)
        .await?;

    Ok(Json(ApiResponse::success(outcome)))
}

/// Delete a user, reassigning or removing their cases
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    tag = "Admin",
    params(("user_id" = Uuid, Path, description = "User to delete")),
    responses(
        (status = 200, description = "User deleted", body = UserDeletion),
        (status = 403, description = "Admin role required or self-deletion"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Cannot delete the last admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserDeletion>>> {
    require_admin(&user)?;

    let outcome = state.lifecycle.delete_user(user.actor(), user_id).await?;

    Ok(Json(ApiResponse::success(outcome)))
}

/// Upload a file into a user's personal storage
#[utoipa::path(
    post,
    path = "/admin/users/upload",
    tag = "Admin",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, bad type or oversized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_personal_file(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Created<UploadResponse>> {
    require_admin(&user)?;

    let mut target_user: Option<Uuid> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        match field.name() {
            Some("userId") | Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
                target_user = Some(
                    text.parse()
                        .map_err(|_| AppError::validation("userId must be a valid UUID"))?,
                );
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("unnamed")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let target_user = target_user.ok_or_else(|| AppError::validation("userId is required"))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::validation("file is required"))?;

    let upload = state
        .personal_files
        .upload_personal_file(target_user, file_name, content_type, bytes)
        .await?;

    Ok(Created(UploadResponse::from(upload)))
}

/// List a user's personal files
#[utoipa::path(
    get,
    path = "/admin/personal-files",
    tag = "Admin",
    params(("user_id" = Uuid, Query, description = "Owner of the files")),
    responses(
        (status = 200, description = "Personal files, newest first", body = [UploadResponse]),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_personal_files(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PersonalFilesQuery>,
) -> AppResult<Json<ApiResponse<Vec<UploadResponse>>>> {
    require_admin(&user)?;

    let files = state
        .personal_files
        .list_personal_files(query.user_id)
        .await?;

    Ok(Json(ApiResponse::success(
        files.into_iter().map(UploadResponse::from).collect(),
    )))
}

/// List users joined with their personal info
#[utoipa::path(
    get,
    path = "/admin/users-with-info",
    tag = "Admin",
    responses(
        (status = 200, description = "Users with personal info", body = [UserWithInfo]),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn users_with_info(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<UserWithInfo>>>> {
    require_admin(&user)?;

    let users = state.user_directory.list_users_with_info().await?;

    Ok(Json(ApiResponse::success(users)))
}
