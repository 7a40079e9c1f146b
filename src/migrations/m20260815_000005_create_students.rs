//! Migration: Create students table

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
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Students::AdmissionNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(ColumnDef::new(Students::GuardianName).string().null())
                    .col(
                        ColumnDef::new(Students::CurrentSessionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Students::CurrentClassId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Students::CurrentSectionId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Students::ParentUserId).big_integer().null())
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ParentUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_school")
                    .table(Students::Table)
                    .col(Students::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_admission_number")
                    .table(Students::Table)
                    .col(Students::AdmissionNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "students"]
pub enum Students {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "admission_number"]
    AdmissionNumber,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "date_of_birth"]
    DateOfBirth,
    #[iden = "guardian_name"]
    GuardianName,
    #[iden = "current_session_id"]
    CurrentSessionId,
    #[iden = "current_class_id"]
    CurrentClassId,
    #[iden = "current_section_id"]
    CurrentSectionId,
    #[iden = "parent_user_id"]
    ParentUserId,
    #[iden = "is_active"]
    IsActive,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
