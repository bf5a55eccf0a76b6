//! Integration tests for transactional user deletion.

mod common;

use std::sync::Arc;

use casetrack::domain::{Actor, UserRole};
use casetrack::errors::AppError;
use casetrack::infra::{MemoryObjectStore, ObjectStore, UnitOfWork};
use casetrack::services::{
    LifecycleManager, PersonalFileManager, PersonalFileService, UserLifecycleService,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::{create_case, create_user, insert_note, insert_upload, setup};

use casetrack::infra::repositories::entities::{case, note, upload, user};

fn actor(id: Uuid, role: UserRole) -> Actor {
    Actor { id, role }
}

#[tokio::test]
async fn deleting_a_user_hands_cases_to_a_substitute_admin() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;

    let case_a = create_case(&ctx.uow, alice.id, "Mercer").await;
    let case_b = create_case(&ctx.uow, alice.id, "Estate").await;

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let outcome = svc
        .delete_user(actor(admin.id, UserRole::Admin), alice.id)
        .await
        .unwrap();

    assert_eq!(outcome.reassigned, 2);
    assert_eq!(outcome.substitute, Some(admin.id));

    assert!(ctx.uow.users().find_by_id(alice.id).await.unwrap().is_none());
    for id in [case_a.id, case_b.id] {
        let moved = ctx.uow.cases().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(moved.user_id, admin.id);
    }
}

#[tokio::test]
async fn the_personal_case_is_removed_rather_than_inherited() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;

    let personal_svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());
    // The substitute already holds a personal case, so inheriting
    // Alice's would break the one-per-user rule
    personal_svc.get_or_create_personal_case(admin.id).await.unwrap();
    let alice_personal = personal_svc.get_or_create_personal_case(alice.id).await.unwrap();
    let upload = personal_svc
        .upload_personal_file(
            alice.id,
            "id-card.png".to_string(),
            "image/png".to_string(),
            vec![0u8; 64],
        )
        .await
        .unwrap();

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let outcome = svc
        .delete_user(actor(admin.id, UserRole::Admin), alice.id)
        .await
        .unwrap();

    assert_eq!(outcome.removed, 1);
    assert!(ctx
        .uow
        .cases()
        .find_by_id(alice_personal.id)
        .await
        .unwrap()
        .is_none());
    assert!(
        !ctx.store.contains(&upload.file_url),
        "orphaned blob is cleaned up after commit"
    );
}

#[tokio::test]
async fn self_deletion_is_refused() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_user(actor(admin.id, UserRole::Admin), admin.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert!(ctx.uow.users().find_by_id(admin.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_missing_user_is_not_found() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_user(actor(admin.id, UserRole::Admin), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn the_last_admin_cannot_be_deleted() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let case = create_case(&ctx.uow, admin.id, "Docket").await;

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_user(actor(alice.id, UserRole::User), admin.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvariantViolation(_)));

    // Nothing changed
    assert!(ctx.uow.users().find_by_id(admin.id).await.unwrap().is_some());
    let kept = ctx.uow.cases().find_by_id(case.id).await.unwrap().unwrap();
    assert_eq!(kept.user_id, admin.id);
}

#[tokio::test]
async fn an_admin_can_go_once_another_admin_remains() {
    let ctx = setup().await;
    let admin_a = create_user(&ctx.uow, "AdminA", UserRole::Admin).await;
    let admin_b = create_user(&ctx.uow, "AdminB", UserRole::Admin).await;
    create_case(&ctx.uow, admin_b.id, "Open Matter").await;

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let outcome = svc
        .delete_user(actor(admin_a.id, UserRole::Admin), admin_b.id)
        .await
        .unwrap();

    assert_eq!(outcome.substitute, Some(admin_a.id));
    assert_eq!(outcome.reassigned, 1);
    assert!(ctx.uow.users().find_by_id(admin_b.id).await.unwrap().is_none());
}

#[tokio::test]
async fn without_a_substitute_all_owned_cases_cascade_away() {
    let ctx = setup().await;
    // No admins exist at all; disposal falls back to cascade deletion
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;

    let case = create_case(&ctx.uow, alice.id, "Mercer").await;
    insert_note(&ctx.conn, case.id, bob.id).await;
    let upload_url = "memory://case-files/evidence.pdf";
    insert_upload(&ctx.conn, case.id, bob.id, upload_url).await;
    ctx.store
        .upload("case-files", "evidence.pdf", "application/pdf", vec![1])
        .await
        .unwrap();

    let svc = LifecycleManager::new(ctx.uow.clone(), ctx.store.clone());
    let outcome = svc
        .delete_user(actor(bob.id, UserRole::User), alice.id)
        .await
        .unwrap();

    assert_eq!(outcome.reassigned, 0);
    assert_eq!(outcome.removed, 1);
    assert!(outcome.substitute.is_none());

    // No row anywhere still references the deleted user
    assert!(ctx.uow.users().find_by_id(alice.id).await.unwrap().is_none());
    assert_eq!(case::Entity::find().count(&ctx.conn).await.unwrap(), 0);
    assert_eq!(note::Entity::find().count(&ctx.conn).await.unwrap(), 0);
    assert_eq!(upload::Entity::find().count(&ctx.conn).await.unwrap(), 0);
    assert_eq!(user::Entity::find().count(&ctx.conn).await.unwrap(), 1);
}

#[tokio::test]
async fn storage_failures_never_block_a_committed_deletion() {
    let conn = common::test_db().await;
    let uow = Arc::new(casetrack::infra::Persistence::new(conn.clone()));
    let store = Arc::new(MemoryObjectStore::failing_removals());

    let alice = create_user(&uow, "Alice", UserRole::User).await;
    let bob = create_user(&uow, "Bob", UserRole::User).await;
    let case = create_case(&uow, alice.id, "Mercer").await;
    let url = store
        .upload("case-files", "doc.pdf", "application/pdf", vec![1])
        .await
        .unwrap();
    insert_upload(&conn, case.id, alice.id, &url).await;

    let svc = LifecycleManager::new(uow.clone(), store.clone());
    let outcome = svc
        .delete_user(actor(bob.id, UserRole::User), alice.id)
        .await
        .unwrap();

    assert_eq!(outcome.removed, 1);
    assert!(uow.users().find_by_id(alice.id).await.unwrap().is_none());
    // The blob survived the failed removal but the rows are gone
    assert!(store.contains(&url));
}
