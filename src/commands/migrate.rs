//! Migrate command - manual control over the case database schema.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Schema changes happen only through the explicit action below
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Applying pending migrations");
            db.run_migrations().await?;
            tracing::info!("Case database schema is up to date");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back the last migration");
            db.rollback_migration().await?;
            tracing::info!("Rollback complete");
        }
        MigrateAction::Status => {
            let statuses = db.migration_status().await?;
            let pending = statuses.iter().filter(|s| !s.applied).count();
            for status in &statuses {
                let state = if status.applied { "applied" } else { "pending" };
                println!("{:<60} {}", status.name, state);
            }
            println!("{} migration(s), {} pending", statuses.len(), pending);
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and rebuilding the schema");
            db.fresh_migrations().await?;
            tracing::info!("Fresh schema in place");
        }
    }

    Ok(())
}
