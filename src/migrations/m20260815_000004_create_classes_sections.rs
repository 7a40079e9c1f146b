//! Migration: Create school_classes and sections tables

use sea_orm_migration::prelude::*;

use super::m20260815_000001_create_schools::Schools;
use super::m20260815_000002_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SchoolClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SchoolClasses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SchoolClasses::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SchoolClasses::SessionId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(SchoolClasses::Name).string().not_null())
                    .col(
                        ColumnDef::new(SchoolClasses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SchoolClasses::Table, SchoolClasses::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_school_classes_school")
                    .table(SchoolClasses::Table)
                    .col(SchoolClasses::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sections::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Sections::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Sections::Name).string().not_null())
                    .col(
                        ColumnDef::new(Sections::ClassTeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sections::Table, Sections::ClassId)
                            .to(SchoolClasses::Table, SchoolClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sections::Table, Sections::ClassTeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sections_class")
                    .table(Sections::Table)
                    .col(Sections::ClassId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sections::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SchoolClasses::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "school_classes"]
pub enum SchoolClasses {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "session_id"]
    SessionId,
    Name,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
#[iden = "sections"]
pub enum Sections {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "class_id"]
    ClassId,
    Name,
    #[iden = "class_teacher_id"]
    ClassTeacherId,
    #[iden = "created_at"]
    CreatedAt,
}
