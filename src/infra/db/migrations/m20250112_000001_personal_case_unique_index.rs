//! Migration: Enforce at most one PERSONAL case per user.
//!
//! A partial unique index closes the find-then-create race in the
//! personal case provisioner: concurrent first uploads for the same
//! user can both miss the lookup, but only one insert can win here.
//! sea-query's index builder cannot express partial indexes, so the
//! statement is issued as raw SQL (valid on both Postgres and SQLite).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX ux_cases_personal_owner \
                 ON cases (user_id) WHERE case_type = 'PERSONAL'",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX ux_cases_personal_owner")
            .await?;
        Ok(())
    }
}
