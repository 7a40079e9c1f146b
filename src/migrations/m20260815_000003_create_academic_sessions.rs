//! Migration: Create academic_sessions table

use sea_orm_migration::prelude::*;

use super::m20260815_000001_create_schools::Schools;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AcademicSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicSessions::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicSessions::Name).string().not_null())
                    .col(
                        ColumnDef::new(AcademicSessions::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicSessions::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(AcademicSessions::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AcademicSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicSessions::Table, AcademicSessions::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academic_sessions_school")
                    .table(AcademicSessions::Table)
                    .col(AcademicSessions::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AcademicSessions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "academic_sessions"]
pub enum AcademicSessions {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    Name,
    #[iden = "start_date"]
    StartDate,
    #[iden = "end_date"]
    EndDate,
    #[iden = "is_active"]
    IsActive,
    #[iden = "created_at"]
    CreatedAt,
}
