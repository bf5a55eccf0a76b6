//! Case domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::PERSONAL_CASE_TYPE;

/// Case domain entity.
///
/// `case_type` is free-form except for the reserved literal `PERSONAL`,
/// which marks the synthetic container for a user's non-case files.
/// Every case has exactly one owner; `user_id` is never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub case_type: String,
    pub registration_year: i32,
    pub registration_num: i32,
    pub title: String,
    pub court_name: String,
    pub is_completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Check whether this is the synthetic personal-file container
    pub fn is_personal(&self) -> bool {
        self.case_type == PERSONAL_CASE_TYPE
    }
}

/// Case response payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CaseResponse {
    pub id: Uuid,
    #[schema(example = "CIVIL")]
    pub case_type: String,
    pub registration_year: i32,
    pub registration_num: i32,
    pub title: String,
    pub court_name: String,
    pub is_completed: bool,
    /// Current owner of the case
    pub user_id: Uuid,
}

impl From<Case> for CaseResponse {
    fn from(case: Case) -> Self {
        Self {
            id: case.id,
            case_type: case.case_type,
            registration_year: case.registration_year,
            registration_num: case.registration_num,
            title: case.title,
            court_name: case.court_name,
            is_completed: case.is_completed,
            user_id: case.user_id,
        }
    }
}
