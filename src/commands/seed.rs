//! Seed command - initial admin account and demo data.

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::domain::{Case, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the seed command.
///
/// Idempotent: users dedup on email, cases on their registration key.
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    tracing::info!("Seeding database...");

    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    db.run_migrations()
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    let uow = Persistence::new(db.get_connection());

    let admin = ensure_user(&uow, &args.admin_email, "Administrator", UserRole::Admin).await?;
    tracing::info!("Admin account ready: {}", admin.email);

    if args.with_demo_data {
        let demo = ensure_user(&uow, "demo@example.com", "Demo User", UserRole::User).await?;

        let year = Utc::now().year();
        let samples = [
            (1001, "State vs. Mercer", "District Court", admin.id),
            (1002, "Alvarez Estate", "Probate Court", admin.id),
            (1003, "Hartley Contract Dispute", "Civil Court", demo.id),
        ];

        for (num, title, court, owner) in samples {
            seed_case(&uow, year, num, title, court, owner).await?;
        }
        tracing::info!("Demo data seeded");
    }

    tracing::info!("Seeding complete");
    Ok(())
}

async fn ensure_user(
    uow: &Persistence,
    email: &str,
    name: &str,
    role: UserRole,
) -> AppResult<User> {
    if let Some(existing) = uow.users().find_by_email(email).await? {
        return Ok(existing);
    }

    let now = Utc::now();
    uow.users()
        .insert(User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            created_at: now,
            updated_at: now,
        })
        .await
}

async fn seed_case(
    uow: &Persistence,
    year: i32,
    num: i32,
    title: &str,
    court: &str,
    owner: Uuid,
) -> AppResult<()> {
    if uow.cases().exists_by_registration(year, num, "CIVIL").await? {
        return Ok(());
    }

    let now = Utc::now();
    uow.cases()
        .insert(Case {
            id: Uuid::new_v4(),
            case_type: "CIVIL".to_string(),
            registration_year: year,
            registration_num: num,
            title: title.to_string(),
            court_name: court.to_string(),
            is_completed: false,
            user_id: owner,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(())
}
