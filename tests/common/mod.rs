//! Shared test harness: in-memory SQLite database and fixtures.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Datelike, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database as SeaDatabase, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use casetrack::domain::{Case, User, UserRole};
use casetrack::infra::repositories::entities::{note, upload};
use casetrack::infra::{MemoryObjectStore, Migrator, Persistence, UnitOfWork};

/// Connect an in-memory SQLite database with migrations applied.
///
/// The pool is capped at one connection; separate connections to
/// `sqlite::memory:` would each get their own empty database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);

    let conn = SeaDatabase::connect(opts)
        .await
        .expect("failed to open in-memory sqlite");

    Migrator::up(&conn, None)
        .await
        .expect("failed to run migrations");

    conn
}

/// Database plus unit of work and an in-memory object store.
pub struct TestContext {
    pub conn: DatabaseConnection,
    pub uow: Arc<Persistence>,
    pub store: Arc<MemoryObjectStore>,
}

pub async fn setup() -> TestContext {
    let conn = test_db().await;
    let uow = Arc::new(Persistence::new(conn.clone()));
    let store = Arc::new(MemoryObjectStore::new());

    TestContext { conn, uow, store }
}

pub async fn create_user(uow: &Persistence, name: &str, role: UserRole) -> User {
    let now = Utc::now();
    uow.users()
        .insert(User {
            id: Uuid::new_v4(),
            email: format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            name: name.to_string(),
            role,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to insert user")
}

pub async fn create_case(uow: &Persistence, owner: Uuid, title: &str) -> Case {
    let now = Utc::now();
    uow.cases()
        .insert(Case {
            id: Uuid::new_v4(),
            case_type: "CIVIL".to_string(),
            registration_year: now.year(),
            registration_num: rand_num(),
            title: title.to_string(),
            court_name: "District Court".to_string(),
            is_completed: false,
            user_id: owner,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("failed to insert case")
}

pub async fn insert_note(conn: &DatabaseConnection, case_id: Uuid, author: Uuid) -> Uuid {
    let now = Utc::now();
    let id = Uuid::new_v4();
    note::ActiveModel {
        id: Set(id),
        case_id: Set(case_id),
        user_id: Set(author),
        content: Set("note".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert note");
    id
}

pub async fn insert_upload(
    conn: &DatabaseConnection,
    case_id: Uuid,
    author: Uuid,
    file_url: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    upload::ActiveModel {
        id: Set(id),
        case_id: Set(Some(case_id)),
        user_id: Set(author),
        file_name: Set("document.pdf".to_string()),
        file_url: Set(file_url.to_string()),
        file_type: Set("application/pdf".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("failed to insert upload");
    id
}

fn rand_num() -> i32 {
    // Uuid bytes as a cheap uniqueness source for registration numbers
    let bytes = Uuid::new_v4().into_bytes();
    i32::from(bytes[0]) * 256 + i32::from(bytes[1])
}
