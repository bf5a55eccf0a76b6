//! Case handlers - assignment and deletion.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{delete, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::CaseAssignment;
use crate::types::{ApiResponse, NoContent};

/// Single-case assignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignCaseRequest {
    /// New owner of the case
    pub user_id: Uuid,
}

/// Create case routes
pub fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/:case_id/assign", post(assign_case))
        .route("/:case_id", delete(delete_case))
}

/// Assign a case to a user
#[utoipa::path(
    post,
    path = "/cases/{case_id}/assign",
    tag = "Cases",
    params(("case_id" = Uuid, Path, description = "Case to assign")),
    request_body = AssignCaseRequest,
    responses(
        (status = 200, description = "Case assigned", body = CaseAssignment),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Case or user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_case(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(case_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignCaseRequest>,
) -> AppResult<Json<ApiResponse<CaseAssignment>>> {
    require_admin(&user)?;

    let outcome = state
        .transfers
        .reassign_case(case_id, payload.user_id)
        .await?;

    let message = if outcome.already_assigned {
        "Case already assigned to this user"
    } else {
        "Case assigned"
    };

    Ok(Json(ApiResponse::with_message(outcome, message)))
}

/// Delete a case and everything attached to it
#[utoipa::path(
    delete,
    path = "/cases/{case_id}",
    tag = "Cases",
    params(("case_id" = Uuid, Path, description = "Case to delete")),
    responses(
        (status = 204, description = "Case deleted"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Case not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_case(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(case_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.case_service.delete_case(user.actor(), case_id).await?;

    Ok(NoContent)
}
