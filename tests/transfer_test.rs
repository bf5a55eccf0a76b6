//! Integration tests for single and bulk case reassignment.

mod common;

use casetrack::domain::{Actor, UserRole};
use casetrack::errors::AppError;
use casetrack::infra::UnitOfWork;
use casetrack::services::{CaseTransferService, PersonalFileManager, PersonalFileService, TransferEngine};
use uuid::Uuid;

use common::{create_case, create_user, insert_note, insert_upload, setup};

fn actor(id: Uuid, role: UserRole) -> Actor {
    Actor { id, role }
}

#[tokio::test]
async fn reassign_moves_ownership_and_reports_preserved_contributions() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Mercer Dispute").await;

    insert_note(&ctx.conn, case.id, alice.id).await;
    insert_note(&ctx.conn, case.id, alice.id).await;
    insert_upload(&ctx.conn, case.id, alice.id, "memory://case-files/a.pdf").await;

    let svc = TransferEngine::new(ctx.uow.clone());
    let outcome = svc.reassign_case(case.id, bob.id).await.unwrap();

    assert!(!outcome.already_assigned);
    assert_eq!(outcome.case.user_id, bob.id);
    assert_eq!(outcome.preserved_notes, 2);
    assert_eq!(outcome.preserved_uploads, 1);

    // The original author stays on the preserved rows
    let moved = ctx.uow.cases().find_by_id(case.id).await.unwrap().unwrap();
    assert_eq!(moved.user_id, bob.id);
}

#[tokio::test]
async fn reassigning_to_the_current_owner_is_a_no_op() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Estate Matter").await;

    let svc = TransferEngine::new(ctx.uow.clone());

    let outcome = svc.reassign_case(case.id, alice.id).await.unwrap();
    assert!(outcome.already_assigned);
    assert_eq!(outcome.case.user_id, alice.id);

    // Repeating the same assignment changes nothing
    let again = svc.reassign_case(case.id, alice.id).await.unwrap();
    assert!(again.already_assigned);
}

#[tokio::test]
async fn reassign_rejects_missing_case_or_user() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Contract Row").await;

    let svc = TransferEngine::new(ctx.uow.clone());

    let err = svc.reassign_case(Uuid::new_v4(), alice.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = svc.reassign_case(case.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn reassigning_a_personal_case_onto_a_holder_is_refused() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;

    let personal_svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());
    let alice_personal = personal_svc.get_or_create_personal_case(alice.id).await.unwrap();
    personal_svc.get_or_create_personal_case(bob.id).await.unwrap();

    let svc = TransferEngine::new(ctx.uow.clone());
    let err = svc.reassign_case(alice_personal.id, bob.id).await.unwrap_err();

    assert!(matches!(err, AppError::InvariantViolation(_)));

    // Rolled back: Alice keeps her personal case
    let kept = ctx.uow.cases().find_personal(alice.id).await.unwrap();
    assert_eq!(kept.map(|c| c.id), Some(alice_personal.id));
}

#[tokio::test]
async fn bulk_transfer_moves_every_case_of_the_source() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;

    for title in ["One", "Two", "Three"] {
        create_case(&ctx.uow, alice.id, title).await;
    }

    let svc = TransferEngine::new(ctx.uow.clone());
    let outcome = svc
        .bulk_reassign(actor(admin.id, UserRole::Admin), Some(alice.id), bob.id)
        .await
        .unwrap();

    assert_eq!(outcome.prior_total, 3);
    assert_eq!(outcome.moved, 3);
    assert_eq!(outcome.personal_retained, 0);
}

#[tokio::test]
async fn self_transfer_keeps_the_personal_case_behind() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;

    let personal_svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());
    let personal = personal_svc.get_or_create_personal_case(admin.id).await.unwrap();
    create_case(&ctx.uow, admin.id, "Handover One").await;
    create_case(&ctx.uow, admin.id, "Handover Two").await;

    let svc = TransferEngine::new(ctx.uow.clone());
    let outcome = svc
        .bulk_reassign(actor(admin.id, UserRole::Admin), Some(admin.id), bob.id)
        .await
        .unwrap();

    assert_eq!(outcome.prior_total, 3);
    assert_eq!(outcome.moved, 2);
    assert_eq!(outcome.personal_retained, 1);

    let kept = ctx.uow.cases().find_by_id(personal.id).await.unwrap().unwrap();
    assert_eq!(kept.user_id, admin.id, "personal case stays with the admin");
}

#[tokio::test]
async fn bulk_transfer_requires_distinct_existing_users() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;

    let svc = TransferEngine::new(ctx.uow.clone());

    let err = svc
        .bulk_reassign(actor(admin.id, UserRole::Admin), Some(alice.id), alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = svc
        .bulk_reassign(
            actor(admin.id, UserRole::Admin),
            Some(Uuid::new_v4()),
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn claiming_unassigned_cases_is_vacuous() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;

    let svc = TransferEngine::new(ctx.uow.clone());
    let outcome = svc
        .bulk_reassign(actor(admin.id, UserRole::Admin), None, admin.id)
        .await
        .unwrap();

    assert_eq!(outcome.moved, 0);
    assert_eq!(outcome.prior_total, 0);
}
