//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, case_handler, upload_handler};
use crate::domain::{CaseResponse, PersonalInfo, UploadResponse, UserResponse, UserRole, UserWithInfo};
use crate::services::{BulkTransfer, CaseAssignment, UserDeletion};

/// OpenAPI documentation for the case tracking service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Case Tracking Service",
        version = "0.1.0",
        description = "Legal case ownership and lifecycle management API",
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    paths(
        // Admin endpoints
        admin_handler::bulk_reassign,
        admin_handler::delete_user,
        admin_handler::upload_personal_file,
        admin_handler::list_personal_files,
        admin_handler::users_with_info,
        // Case endpoints
        case_handler::assign_case,
        case_handler::delete_case,
        // Upload endpoints
        upload_handler::delete_upload,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            UserWithInfo,
            PersonalInfo,
            CaseResponse,
            UploadResponse,
            // Operation outcomes
            BulkTransfer,
            CaseAssignment,
            UserDeletion,
            // Request types
            admin_handler::BulkReassignRequest,
            case_handler::AssignCaseRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Admin", description = "Ownership transfers, user lifecycle and personal files"),
        (name = "Cases", description = "Case assignment and deletion"),
        (name = "Uploads", description = "Upload management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
