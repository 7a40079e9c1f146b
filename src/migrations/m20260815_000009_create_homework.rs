//! Migration: Create homework table

use sea_orm_migration::prelude::*;

use super::m20260815_000001_create_schools::Schools;
use super::m20260815_000004_create_classes_sections::SchoolClasses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Homework::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Homework::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Homework::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Homework::SectionId).big_integer().null())
                    .col(ColumnDef::new(Homework::Subject).string().not_null())
                    .col(ColumnDef::new(Homework::Title).string().not_null())
                    .col(ColumnDef::new(Homework::Description).string().null())
                    .col(ColumnDef::new(Homework::DueDate).date().null())
                    .col(
                        ColumnDef::new(Homework::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Homework::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Homework::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Homework::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Homework::Table, Homework::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Homework::Table, Homework::ClassId)
                            .to(SchoolClasses::Table, SchoolClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_homework_class")
                    .table(Homework::Table)
                    .col(Homework::ClassId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Homework::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "homework"]
pub enum Homework {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "session_id"]
    SessionId,
    #[iden = "class_id"]
    ClassId,
    #[iden = "section_id"]
    SectionId,
    Subject,
    Title,
    Description,
    #[iden = "due_date"]
    DueDate,
    #[iden = "is_published"]
    IsPublished,
    #[iden = "created_by"]
    CreatedBy,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
