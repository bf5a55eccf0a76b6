//! Case transfer service - single and bulk ownership reassignment.
//!
//! Transfers move the case row's owner only. Notes and uploads keep
//! their original author so the audit trail survives handovers; the
//! outcome reports how many of those preserved contributions exist.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Actor, CaseResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Outcome of a single-case reassignment.
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseAssignment {
    pub case: CaseResponse,
    /// True when the case already belonged to the target and no
    /// write happened
    pub already_assigned: bool,
    /// Notes on the case authored by someone other than the new owner
    pub preserved_notes: u64,
    /// Uploads on the case from someone other than the new owner
    pub preserved_uploads: u64,
}

/// Outcome of a bulk reassignment.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkTransfer {
    /// Cases moved to the target
    pub moved: u64,
    /// Cases the source owned before the transfer
    pub prior_total: u64,
    /// PERSONAL cases retained by a self-transferring source
    pub personal_retained: u64,
    pub message: String,
}

/// Case transfer service trait for dependency injection.
#[async_trait]
pub trait CaseTransferService: Send + Sync {
    /// Assign a single case to a new owner.
    ///
    /// Idempotent: assigning to the current owner succeeds without a
    /// write and reports `already_assigned`.
    async fn reassign_case(&self, case_id: Uuid, target_user_id: Uuid)
        -> AppResult<CaseAssignment>;

    /// Move every case owned by `source` to `target` in one atomic
    /// update.
    ///
    /// When the acting admin transfers away their own cases, their
    /// PERSONAL case stays behind. A `None` source claims ownerless
    /// cases, of which there are none while owners are mandatory.
    async fn bulk_reassign(
        &self,
        actor: Actor,
        source: Option<Uuid>,
        target: Uuid,
    ) -> AppResult<BulkTransfer>;
}

/// A transfer that would give the target a second PERSONAL case trips
/// the partial unique index; surface that as the invariant it protects
fn map_personal_conflict(err: AppError) -> AppError {
    match err {
        AppError::Database(e)
            if matches!(
                e.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ) =>
        {
            AppError::invariant("Target user already has a personal case")
        }
        other => other,
    }
}

/// Concrete implementation of CaseTransferService.
pub struct TransferEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TransferEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CaseTransferService for TransferEngine<U> {
    async fn reassign_case(
        &self,
        case_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<CaseAssignment> {
        with_transaction!(self.uow, |ctx| {
            let case = ctx.cases().find_by_id(case_id).await?.ok_or_not_found()?;
            ctx.users()
                .find_by_id(target_user_id)
                .await?
                .ok_or_not_found()?;

            let already_assigned = case.user_id == target_user_id;
            if !already_assigned {
                ctx.cases()
                    .set_owner(case_id, target_user_id)
                    .await
                    .map_err(map_personal_conflict)?;
            }

            let preserved_notes = ctx.notes().count_foreign(case_id, target_user_id).await?;
            let preserved_uploads = ctx
                .uploads()
                .count_foreign(case_id, target_user_id)
                .await?;

            let case = ctx.cases().find_by_id(case_id).await?.ok_or_not_found()?;

            Ok(CaseAssignment {
                case: case.into(),
                already_assigned,
                preserved_notes,
                preserved_uploads,
            })
        })
    }

    async fn bulk_reassign(
        &self,
        actor: Actor,
        source: Option<Uuid>,
        target: Uuid,
    ) -> AppResult<BulkTransfer> {
        with_transaction!(self.uow, |ctx| {
            let target_user = ctx.users().find_by_id(target).await?.ok_or_not_found()?;

            let Some(source_id) = source else {
                // Owners are mandatory, so there is never anything to
                // claim; the contract answers instead of erroring
                return Ok(BulkTransfer {
                    moved: 0,
                    prior_total: 0,
                    personal_retained: 0,
                    message: "No unassigned cases to claim".to_string(),
                });
            };

            if source_id == target {
                return Err(AppError::validation(
                    "Source and target users must differ",
                ));
            }

            ctx.users().find_by_id(source_id).await?.ok_or_not_found()?;

            let prior_total = ctx.cases().count_owned_by(source_id).await?;

            let moved = if source_id == actor.id {
                ctx.cases()
                    .reassign_all_except_personal(source_id, target)
                    .await?
            } else {
                ctx.cases()
                    .reassign_all(source_id, target)
                    .await
                    .map_err(map_personal_conflict)?
            };

            // A commit racing in between the count and the update can
            // make `moved` exceed the earlier snapshot
            let personal_retained = prior_total.saturating_sub(moved);
            let message = if personal_retained > 0 {
                format!(
                    "Reassigned {} case(s) to {}; {} personal case(s) retained",
                    moved, target_user.name, personal_retained
                )
            } else {
                format!("Reassigned {} case(s) to {}", moved, target_user.name)
            };

            Ok(BulkTransfer {
                moved,
                prior_total,
                personal_retained,
                message,
            })
        })
    }
}
