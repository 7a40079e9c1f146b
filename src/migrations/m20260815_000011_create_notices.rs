//! Migration: Create notices and notice_reads tables

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
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notices::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Body).string().not_null())
                    .col(
                        ColumnDef::new(Notices::TargetRole)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notices::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notices::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Notices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notices::Table, Notices::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_school")
                    .table(Notices::Table)
                    .col(Notices::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoticeReads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoticeReads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoticeReads::NoticeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NoticeReads::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(NoticeReads::ReadAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NoticeReads::Table, NoticeReads::NoticeId)
                            .to(Notices::Table, Notices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NoticeReads::Table, NoticeReads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_notice_reads_notice_user")
                    .table(NoticeReads::Table)
                    .col(NoticeReads::NoticeId)
                    .col(NoticeReads::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(NoticeReads::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Notices::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "notices"]
pub enum Notices {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    Title,
    Body,
    #[iden = "target_role"]
    TargetRole,
    #[iden = "is_published"]
    IsPublished,
    #[iden = "created_by"]
    CreatedBy,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
#[iden = "notice_reads"]
pub enum NoticeReads {
    Table,
    Id,
    #[iden = "notice_id"]
    NoticeId,
    #[iden = "user_id"]
    UserId,
    #[iden = "read_at"]
    ReadAt,
}
