//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages transaction lifecycle
//! (begin, commit, rollback) so multi-step ownership operations are
//! atomic: a mid-sequence failure never leaves a case owned by a user
//! that no longer exists.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;

use super::repositories::{
    CaseRepository, CaseStore, UploadRepository, UploadStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. Note: this trait is not mockable directly due to the
/// generic `transaction` method. For testing, mock at the repository
/// level or use integration tests against a real database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get case repository
    fn cases(&self) -> Arc<dyn CaseRepository>;

    /// Get upload repository
    fn uploads(&self) -> Arc<dyn UploadRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled
    /// back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    /// Create a new transaction context
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    /// Get case repository for this transaction
    pub fn cases(&self) -> TxCaseRepository<'_> {
        TxCaseRepository::new(self.txn)
    }

    /// Get note repository for this transaction
    pub fn notes(&self) -> TxNoteRepository<'_> {
        TxNoteRepository::new(self.txn)
    }

    /// Get upload repository for this transaction
    pub fn uploads(&self) -> TxUploadRepository<'_> {
        TxUploadRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    case_repo: Arc<CaseStore>,
    upload_repo: Arc<UploadStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let case_repo = Arc::new(CaseStore::new(db.clone()));
        let upload_repo = Arc::new(UploadStore::new(db.clone()));
        Self {
            db,
            user_repo,
            case_repo,
            upload_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn cases(&self) -> Arc<dyn CaseRepository> {
        self.case_repo.clone()
    }

    fn uploads(&self) -> Arc<dyn UploadRepository> {
        self.upload_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        // Create context with borrowed transaction
        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<crate::domain::User>> {
        use super::repositories::entities::user::Entity as UserEntity;
        use sea_orm::EntityTrait;

        let result = UserEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::User::from))
    }

    /// Count users holding the ADMIN role
    pub async fn count_admins(&self) -> AppResult<u64> {
        use super::repositories::entities::user::{self, Entity as UserEntity};
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

        UserEntity::find()
            .filter(user::Column::Role.eq(crate::config::ROLE_ADMIN))
            .count(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Find any ADMIN user other than the one being excluded.
    ///
    /// Used as the fallback owner for a departing user's cases.
    pub async fn find_substitute_admin(
        &self,
        excluding: uuid::Uuid,
    ) -> AppResult<Option<crate::domain::User>> {
        use super::repositories::entities::user::{self, Entity as UserEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = UserEntity::find()
            .filter(user::Column::Role.eq(crate::config::ROLE_ADMIN))
            .filter(user::Column::Id.ne(excluding))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::User::from))
    }

    /// Delete a user row
    pub async fn delete(&self, id: uuid::Uuid) -> AppResult<()> {
        use super::repositories::entities::user::Entity as UserEntity;
        use sea_orm::EntityTrait;

        let result = UserEntity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Transaction-aware case repository.
pub struct TxCaseRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCaseRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find case by ID
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<crate::domain::Case>> {
        use super::repositories::entities::case::Entity as CaseEntity;
        use sea_orm::EntityTrait;

        let result = CaseEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::Case::from))
    }

    /// Change the owner of a single case
    pub async fn set_owner(&self, case_id: uuid::Uuid, owner: uuid::Uuid) -> AppResult<()> {
        use super::repositories::entities::case::{self, Entity as CaseEntity};
        use sea_orm::sea_query::Expr;
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        CaseEntity::update_many()
            .col_expr(case::Column::UserId, Expr::value(owner))
            .col_expr(case::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(case::Column::Id.eq(case_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    /// Count cases owned by a user
    pub async fn count_owned_by(&self, user_id: uuid::Uuid) -> AppResult<u64> {
        use super::repositories::entities::case::{self, Entity as CaseEntity};
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

        CaseEntity::find()
            .filter(case::Column::UserId.eq(user_id))
            .count(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Reassign every case owned by `source` to `target` in one set
    /// update. Returns the number of rows moved.
    pub async fn reassign_all(
        &self,
        source: uuid::Uuid,
        target: uuid::Uuid,
    ) -> AppResult<u64> {
        use super::repositories::entities::case::{self, Entity as CaseEntity};
        use sea_orm::sea_query::Expr;
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = CaseEntity::update_many()
            .col_expr(case::Column::UserId, Expr::value(target))
            .col_expr(case::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(case::Column::UserId.eq(source))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Reassign every non-PERSONAL case owned by `source` to `target`.
    ///
    /// Used for self-transfers: an admin handing off their workload
    /// must not give away their own personal file container.
    pub async fn reassign_all_except_personal(
        &self,
        source: uuid::Uuid,
        target: uuid::Uuid,
    ) -> AppResult<u64> {
        use super::repositories::entities::case::{self, Entity as CaseEntity};
        use sea_orm::sea_query::Expr;
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = CaseEntity::update_many()
            .col_expr(case::Column::UserId, Expr::value(target))
            .col_expr(case::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(case::Column::UserId.eq(source))
            .filter(case::Column::CaseType.ne(crate::config::PERSONAL_CASE_TYPE))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Delete every case owned by a user; dependent petitioners,
    /// respondents, hearings, notes and uploads cascade at the
    /// storage layer. Returns the number of cases removed.
    pub async fn delete_all_owned_by(&self, user_id: uuid::Uuid) -> AppResult<u64> {
        use super::repositories::entities::case::{self, Entity as CaseEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = CaseEntity::delete_many()
            .filter(case::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Delete a single case row (children cascade)
    pub async fn delete(&self, id: uuid::Uuid) -> AppResult<()> {
        use super::repositories::entities::case::Entity as CaseEntity;
        use sea_orm::EntityTrait;

        let result = CaseEntity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Transaction-aware note repository.
pub struct TxNoteRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxNoteRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Count notes on a case authored by someone other than `owner`.
    ///
    /// These are the "preserved" legacy contributions reported after a
    /// reassignment; the rows themselves are never mutated.
    pub async fn count_foreign(
        &self,
        case_id: uuid::Uuid,
        owner: uuid::Uuid,
    ) -> AppResult<u64> {
        use super::repositories::entities::note::{self, Entity as NoteEntity};
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

        NoteEntity::find()
            .filter(note::Column::CaseId.eq(case_id))
            .filter(note::Column::UserId.ne(owner))
            .count(self.txn)
            .await
            .map_err(AppError::from)
    }
}

/// Transaction-aware upload repository.
pub struct TxUploadRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUploadRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Count uploads on a case from uploaders other than `owner`
    pub async fn count_foreign(
        &self,
        case_id: uuid::Uuid,
        owner: uuid::Uuid,
    ) -> AppResult<u64> {
        use super::repositories::entities::upload::{self, Entity as UploadEntity};
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

        UploadEntity::find()
            .filter(upload::Column::CaseId.eq(case_id))
            .filter(upload::Column::UserId.ne(owner))
            .count(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Collect file URLs of every upload attached to a case.
    ///
    /// Gathered before the row delete so the remote objects can be
    /// cleaned up after the transaction commits.
    pub async fn file_urls_for_case(&self, case_id: uuid::Uuid) -> AppResult<Vec<String>> {
        use super::repositories::entities::upload::{self, Entity as UploadEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

        UploadEntity::find()
            .select_only()
            .column(upload::Column::FileUrl)
            .filter(upload::Column::CaseId.eq(case_id))
            .into_tuple::<String>()
            .all(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Collect file URLs of uploads the user authored, wherever they
    /// are attached. These rows cascade away with the user row.
    pub async fn file_urls_by_uploader(&self, user_id: uuid::Uuid) -> AppResult<Vec<String>> {
        use super::repositories::entities::upload::{self, Entity as UploadEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

        UploadEntity::find()
            .select_only()
            .column(upload::Column::FileUrl)
            .filter(upload::Column::UserId.eq(user_id))
            .into_tuple::<String>()
            .all(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Collect file URLs of uploads attached to any case owned by a
    /// user (for the cascade branch of user deletion)
    pub async fn file_urls_for_owner(&self, user_id: uuid::Uuid) -> AppResult<Vec<String>> {
        use super::repositories::entities::{case, upload, upload::Entity as UploadEntity};
        use sea_orm::{ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait};

        UploadEntity::find()
            .select_only()
            .column(upload::Column::FileUrl)
            .join(JoinType::InnerJoin, upload::Relation::Case.def())
            .filter(case::Column::UserId.eq(user_id))
            .into_tuple::<String>()
            .all(self.txn)
            .await
            .map_err(AppError::from)
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
