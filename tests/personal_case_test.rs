//! Integration tests for personal case provisioning and personal files.

mod common;

use std::sync::Arc;

use casetrack::config::PERSONAL_CASE_TYPE;
use casetrack::domain::{Case, UserRole};
use casetrack::errors::AppError;
use casetrack::infra::UnitOfWork;
use casetrack::services::{PersonalFileManager, PersonalFileService};
use chrono::Utc;
use uuid::Uuid;

use common::{create_user, setup};

#[tokio::test]
async fn provisioning_is_idempotent() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Alice", UserRole::User).await;

    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());

    let first = svc.get_or_create_personal_case(user.id).await.unwrap();
    let second = svc.get_or_create_personal_case(user.id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.case_type, PERSONAL_CASE_TYPE);
    assert_eq!(first.user_id, user.id);
}

#[tokio::test]
async fn concurrent_provisioning_converges_on_one_case() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Bob", UserRole::User).await;

    let svc = Arc::new(PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = svc.clone();
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            svc.get_or_create_personal_case(user_id).await
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        let case = handle.await.unwrap().unwrap();
        ids.insert(case.id);
    }

    assert_eq!(ids.len(), 1, "every caller must see the same personal case");
}

#[tokio::test]
async fn concurrent_uploads_share_one_personal_case() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Grace", UserRole::User).await;

    let svc = Arc::new(PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone()));

    // Two first-time uploads racing each other, neither having
    // provisioned the case beforehand
    let mut handles = Vec::new();
    for n in 0..2u8 {
        let svc = svc.clone();
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            svc.upload_personal_file(
                user_id,
                format!("statement-{n}.pdf"),
                "application/pdf".to_string(),
                vec![n; 32],
            )
            .await
        }));
    }

    let mut case_ids = std::collections::HashSet::new();
    for handle in handles {
        let upload = handle.await.unwrap().unwrap();
        case_ids.insert(upload.case_id);
    }

    let personal = ctx.uow.cases().find_personal(user.id).await.unwrap().unwrap();
    assert_eq!(case_ids.len(), 1, "both uploads land on the same case");
    assert!(case_ids.contains(&Some(personal.id)));

    let files = svc.list_personal_files(user.id).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(ctx.store.object_count(), 2);
}

#[tokio::test]
async fn database_rejects_a_second_personal_case() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Carol", UserRole::User).await;

    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());
    svc.get_or_create_personal_case(user.id).await.unwrap();

    // Bypass the provisioner and try to insert a duplicate directly
    let now = Utc::now();
    let result = ctx
        .uow
        .cases()
        .insert(Case {
            id: Uuid::new_v4(),
            case_type: PERSONAL_CASE_TYPE.to_string(),
            registration_year: 2025,
            registration_num: 42,
            title: "Personal Files".to_string(),
            court_name: "N/A".to_string(),
            is_completed: false,
            user_id: user.id,
            created_at: now,
            updated_at: now,
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn provisioning_requires_an_existing_user() {
    let ctx = setup().await;
    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());

    let err = svc
        .get_or_create_personal_case(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn upload_provisions_the_case_and_stores_the_blob() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Dave", UserRole::User).await;

    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());

    let upload = svc
        .upload_personal_file(
            user.id,
            "passport.pdf".to_string(),
            "application/pdf".to_string(),
            vec![0u8; 128],
        )
        .await
        .unwrap();

    let personal = ctx.uow.cases().find_personal(user.id).await.unwrap().unwrap();
    assert_eq!(upload.case_id, Some(personal.id));
    assert_eq!(ctx.store.object_count(), 1);
    assert!(ctx.store.contains(&upload.file_url));
}

#[tokio::test]
async fn listing_returns_files_newest_first() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Erin", UserRole::User).await;

    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());

    let first = svc
        .upload_personal_file(
            user.id,
            "first.pdf".to_string(),
            "application/pdf".to_string(),
            vec![1],
        )
        .await
        .unwrap();
    let second = svc
        .upload_personal_file(
            user.id,
            "second.pdf".to_string(),
            "application/pdf".to_string(),
            vec![2],
        )
        .await
        .unwrap();

    let files = svc.list_personal_files(user.id).await.unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.id == first.id));
    assert_eq!(
        files.first().map(|f| f.id),
        Some(second.id),
        "newest upload comes first"
    );
}

#[tokio::test]
async fn listing_without_provisioning_is_empty() {
    let ctx = setup().await;
    let user = create_user(&ctx.uow, "Frank", UserRole::User).await;

    let svc = PersonalFileManager::new(ctx.uow.clone(), ctx.store.clone());

    let files = svc.list_personal_files(user.id).await.unwrap();
    assert!(files.is_empty());
    assert!(ctx.uow.cases().find_personal(user.id).await.unwrap().is_none());
}
