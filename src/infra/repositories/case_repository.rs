//! Case repository - queries against the cases table.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::case;
use crate::config::{PERSONAL_CASE_COURT, PERSONAL_CASE_TITLE, PERSONAL_CASE_TYPE};
use crate::domain::Case;
use crate::errors::{AppError, AppResult};

/// Case repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Find case by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Case>>;

    /// Find a user's PERSONAL case, if provisioned
    async fn find_personal(&self, user_id: Uuid) -> AppResult<Option<Case>>;

    /// Get or lazily create the user's single PERSONAL case.
    ///
    /// Idempotent and race-safe: a concurrent creator losing the
    /// insert re-reads the winner's row.
    async fn get_or_create_personal(&self, user_id: Uuid) -> AppResult<Case>;

    /// Insert a new case
    async fn insert(&self, case: Case) -> AppResult<Case>;

    /// Check for an existing case with the same natural key
    /// (registration year + number + type), used to dedup seeding
    async fn exists_by_registration(
        &self,
        year: i32,
        num: i32,
        case_type: &str,
    ) -> AppResult<bool>;
}

/// Connection-backed implementation of CaseRepository
pub struct CaseStore {
    db: DatabaseConnection,
}

impl CaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn personal_query(user_id: Uuid) -> sea_orm::Select<case::Entity> {
        case::Entity::find()
            .filter(case::Column::UserId.eq(user_id))
            .filter(case::Column::CaseType.eq(PERSONAL_CASE_TYPE))
    }
}

#[async_trait]
impl CaseRepository for CaseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Case>> {
        let result = case::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Case::from))
    }

    async fn find_personal(&self, user_id: Uuid) -> AppResult<Option<Case>> {
        let result = Self::personal_query(user_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Case::from))
    }

    async fn get_or_create_personal(&self, user_id: Uuid) -> AppResult<Case> {
        if let Some(existing) = self.find_personal(user_id).await? {
            return Ok(existing);
        }

        // Registration number derived from a truncated Unix timestamp;
        // uniqueness of the pair is best-effort, not guaranteed
        let now = Utc::now();
        let active = case::ActiveModel {
            id: Set(Uuid::new_v4()),
            case_type: Set(PERSONAL_CASE_TYPE.to_string()),
            registration_year: Set(now.year()),
            registration_num: Set((now.timestamp() % 1_000_000) as i32),
            title: Set(PERSONAL_CASE_TITLE.to_string()),
            court_name: Set(PERSONAL_CASE_COURT.to_string()),
            is_completed: Set(false),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active.insert(&self.db).await {
            Ok(model) => Ok(Case::from(model)),
            // A concurrent provisioner won the insert under the
            // ux_cases_personal_owner index; return its row
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Self::personal_query(user_id)
                    .one(&self.db)
                    .await
                    .map_err(AppError::from)?
                    .map(Case::from)
                    .ok_or_else(|| {
                        AppError::internal("Personal case vanished after conflicting insert")
                    })
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn insert(&self, case: Case) -> AppResult<Case> {
        let active = case::ActiveModel {
            id: Set(case.id),
            case_type: Set(case.case_type),
            registration_year: Set(case.registration_year),
            registration_num: Set(case.registration_num),
            title: Set(case.title),
            court_name: Set(case.court_name),
            is_completed: Set(case.is_completed),
            user_id: Set(case.user_id),
            created_at: Set(case.created_at),
            updated_at: Set(case.updated_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Case::from(model))
    }

    async fn exists_by_registration(
        &self,
        year: i32,
        num: i32,
        case_type: &str,
    ) -> AppResult<bool> {
        use sea_orm::PaginatorTrait;

        let count = case::Entity::find()
            .filter(case::Column::RegistrationYear.eq(year))
            .filter(case::Column::RegistrationNum.eq(num))
            .filter(case::Column::CaseType.eq(case_type))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }
}
