//! Upload handlers.

use axum::{
    extract::{Extension, Path, State},
    routing::delete,
    Router,
};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::NoContent;

/// Create upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/:upload_id", delete(delete_upload))
}

/// Delete an upload and its stored file
#[utoipa::path(
    delete,
    path = "/uploads/{upload_id}",
    tag = "Uploads",
    params(("upload_id" = Uuid, Path, description = "Upload to delete")),
    responses(
        (status = 204, description = "Upload deleted"),
        (status = 403, description = "Not the uploader, case owner or an admin"),
        (status = 404, description = "Upload not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(upload_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .case_service
        .delete_upload(user.actor(), upload_id)
        .await?;

    Ok(NoContent)
}
