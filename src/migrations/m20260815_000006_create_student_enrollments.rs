//! Migration: Create student_enrollments table
//!
//! Unique on (student_id, session_id) so re-enrollment is an upsert,
//! never a duplicate row.

use sea_orm_migration::prelude::*;

use super::m20260815_000003_create_academic_sessions::AcademicSessions;
use super::m20260815_000005_create_students::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentEnrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::SectionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEnrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentEnrollments::Table, StudentEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentEnrollments::Table, StudentEnrollments::SessionId)
                            .to(AcademicSessions::Table, AcademicSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_student_enrollments_student_session")
                    .table(StudentEnrollments::Table)
                    .col(StudentEnrollments::StudentId)
                    .col(StudentEnrollments::SessionId)
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
                    .table(StudentEnrollments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "student_enrollments"]
pub enum StudentEnrollments {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "student_id"]
    StudentId,
    #[iden = "session_id"]
    SessionId,
    #[iden = "class_id"]
    ClassId,
    #[iden = "section_id"]
    SectionId,
    Status,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
