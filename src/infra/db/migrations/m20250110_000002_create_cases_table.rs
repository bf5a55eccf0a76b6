//! Migration: Create cases table and its party/hearing child tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cases::CaseType).string().not_null())
                    .col(
                        ColumnDef::new(Cases::RegistrationYear)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cases::RegistrationNum).integer().not_null())
                    .col(ColumnDef::new(Cases::Title).string().not_null())
                    .col(ColumnDef::new(Cases::CourtName).string().not_null())
                    .col(
                        ColumnDef::new(Cases::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Owner is required: a case is never unassigned
                    .col(ColumnDef::new(Cases::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Cases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cases_user_id")
                            .from(Cases::Table, Cases::UserId)
                            .to(Users::Table, Users::Id)
                            // Cases must be reassigned or deleted before
                            // their owner goes away
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cases_user_id")
                    .table(Cases::Table)
                    .col(Cases::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Petitioners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Petitioners::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Petitioners::CaseId).uuid().not_null())
                    .col(ColumnDef::new(Petitioners::Name).string().not_null())
                    .col(ColumnDef::new(Petitioners::Advocate).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_petitioners_case_id")
                            .from(Petitioners::Table, Petitioners::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Respondents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Respondents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Respondents::CaseId).uuid().not_null())
                    .col(ColumnDef::new(Respondents::Name).string().not_null())
                    .col(ColumnDef::new(Respondents::Advocate).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_respondents_case_id")
                            .from(Respondents::Table, Respondents::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hearings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hearings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hearings::CaseId).uuid().not_null())
                    .col(
                        ColumnDef::new(Hearings::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Hearings::Notes).string().null())
                    .col(
                        ColumnDef::new(Hearings::NextDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Hearings::NextPurpose).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hearings_case_id")
                            .from(Hearings::Table, Hearings::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hearings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Respondents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Petitioners::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cases_user_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Cases {
    Table,
    Id,
    CaseType,
    RegistrationYear,
    RegistrationNum,
    Title,
    CourtName,
    IsCompleted,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Petitioners {
    Table,
    Id,
    CaseId,
    Name,
    Advocate,
}

#[derive(Iden)]
enum Respondents {
    Table,
    Id,
    CaseId,
    Name,
    Advocate,
}

#[derive(Iden)]
enum Hearings {
    Table,
    Id,
    CaseId,
    Date,
    Notes,
    NextDate,
    NextPurpose,
}
