//! Migration: Create student_attendance table
//!
//! Unique on (school_id, session_id, student_id, date) so marking the same
//! day twice updates in place.

use sea_orm_migration::prelude::*;

use super::m20260815_000005_create_students::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentAttendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::SectionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentAttendance::Date).date().not_null())
                    .col(
                        ColumnDef::new(StudentAttendance::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::MarkedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentAttendance::Table, StudentAttendance::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_student_attendance_day")
                    .table(StudentAttendance::Table)
                    .col(StudentAttendance::SchoolId)
                    .col(StudentAttendance::SessionId)
                    .col(StudentAttendance::StudentId)
                    .col(StudentAttendance::Date)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_attendance_date")
                    .table(StudentAttendance::Table)
                    .col(StudentAttendance::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(StudentAttendance::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "student_attendance"]
pub enum StudentAttendance {
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
    #[iden = "student_id"]
    StudentId,
    Date,
    Status,
    #[iden = "marked_by"]
    MarkedBy,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
