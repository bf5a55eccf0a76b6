//! Integration tests for case deletion and upload removal.

mod common;

use std::sync::Arc;

use casetrack::domain::{Actor, UserRole};
use casetrack::errors::AppError;
use casetrack::infra::{MemoryObjectStore, ObjectStore, UnitOfWork};
use casetrack::services::{CaseManager, CaseService};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::{create_case, create_user, insert_note, insert_upload, setup};

use casetrack::infra::repositories::entities::{note, upload};

fn actor(id: Uuid, role: UserRole) -> Actor {
    Actor { id, role }
}

#[tokio::test]
async fn the_owner_can_delete_a_case_with_everything_attached() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Mercer").await;

    insert_note(&ctx.conn, case.id, bob.id).await;
    let url = ctx
        .store
        .upload("case-files", "brief.pdf", "application/pdf", vec![1])
        .await
        .unwrap();
    insert_upload(&ctx.conn, case.id, bob.id, &url).await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    svc.delete_case(actor(alice.id, UserRole::User), case.id)
        .await
        .unwrap();

    assert!(ctx.uow.cases().find_by_id(case.id).await.unwrap().is_none());
    assert_eq!(note::Entity::find().count(&ctx.conn).await.unwrap(), 0);
    assert_eq!(upload::Entity::find().count(&ctx.conn).await.unwrap(), 0);
    assert!(!ctx.store.contains(&url), "remote file removed after commit");
}

#[tokio::test]
async fn an_admin_can_delete_any_case() {
    let ctx = setup().await;
    let admin = create_user(&ctx.uow, "Admin", UserRole::Admin).await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Estate").await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    svc.delete_case(actor(admin.id, UserRole::Admin), case.id)
        .await
        .unwrap();

    assert!(ctx.uow.cases().find_by_id(case.id).await.unwrap().is_none());
}

#[tokio::test]
async fn a_stranger_cannot_delete_someone_elses_case() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let mallory = create_user(&ctx.uow, "Mallory", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Estate").await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_case(actor(mallory.id, UserRole::User), case.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert!(ctx.uow.cases().find_by_id(case.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_missing_case_is_not_found() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_case(actor(alice.id, UserRole::User), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn a_stubborn_blob_does_not_undo_the_deletion() {
    let conn = common::test_db().await;
    let uow = Arc::new(casetrack::infra::Persistence::new(conn.clone()));
    let store = Arc::new(MemoryObjectStore::failing_removals());

    let alice = create_user(&uow, "Alice", UserRole::User).await;
    let case = create_case(&uow, alice.id, "Mercer").await;
    let url = store
        .upload("case-files", "brief.pdf", "application/pdf", vec![1])
        .await
        .unwrap();
    insert_upload(&conn, case.id, alice.id, &url).await;

    let svc = CaseManager::new(uow.clone(), store.clone());
    svc.delete_case(actor(alice.id, UserRole::User), case.id)
        .await
        .unwrap();

    assert!(uow.cases().find_by_id(case.id).await.unwrap().is_none());
    assert!(store.contains(&url), "blob left behind, deletion committed");
}

#[tokio::test]
async fn the_uploader_can_remove_their_upload() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Mercer").await;

    let url = ctx
        .store
        .upload("case-files", "exhibit.png", "image/png", vec![2])
        .await
        .unwrap();
    let upload_id = insert_upload(&ctx.conn, case.id, bob.id, &url).await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    svc.delete_upload(actor(bob.id, UserRole::User), upload_id)
        .await
        .unwrap();

    assert!(ctx.uow.uploads().find_by_id(upload_id).await.unwrap().is_none());
    assert!(!ctx.store.contains(&url));
}

#[tokio::test]
async fn the_case_owner_can_remove_a_foreign_upload() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Mercer").await;

    let upload_id = insert_upload(&ctx.conn, case.id, bob.id, "memory://case-files/x.pdf").await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    svc.delete_upload(actor(alice.id, UserRole::User), upload_id)
        .await
        .unwrap();

    assert!(ctx.uow.uploads().find_by_id(upload_id).await.unwrap().is_none());
}

#[tokio::test]
async fn a_stranger_cannot_remove_an_upload() {
    let ctx = setup().await;
    let alice = create_user(&ctx.uow, "Alice", UserRole::User).await;
    let bob = create_user(&ctx.uow, "Bob", UserRole::User).await;
    let mallory = create_user(&ctx.uow, "Mallory", UserRole::User).await;
    let case = create_case(&ctx.uow, alice.id, "Mercer").await;

    let upload_id = insert_upload(&ctx.conn, case.id, bob.id, "memory://case-files/y.pdf").await;

    let svc = CaseManager::new(ctx.uow.clone(), ctx.store.clone());
    let err = svc
        .delete_upload(actor(mallory.id, UserRole::User), upload_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert!(ctx.uow.uploads().find_by_id(upload_id).await.unwrap().is_some());
}
