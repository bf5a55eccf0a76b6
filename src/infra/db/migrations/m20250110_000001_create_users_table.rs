//! Migration: Create users and personal_info tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PersonalInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalInfo::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfo::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PersonalInfo::Address).string().null())
                    .col(ColumnDef::new(PersonalInfo::City).string().null())
                    .col(ColumnDef::new(PersonalInfo::State).string().null())
                    .col(ColumnDef::new(PersonalInfo::ZipCode).string().null())
                    .col(ColumnDef::new(PersonalInfo::PhoneNumber).string().null())
                    .col(
                        ColumnDef::new(PersonalInfo::DateOfBirth)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PersonalInfo::IdNumber).string().null())
                    .col(ColumnDef::new(PersonalInfo::Notes).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personal_info_user_id")
                            .from(PersonalInfo::Table, PersonalInfo::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonalInfo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PersonalInfo {
    Table,
    Id,
    UserId,
    Address,
    City,
    State,
    ZipCode,
    PhoneNumber,
    DateOfBirth,
    IdNumber,
    Notes,
}
