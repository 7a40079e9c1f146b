//! Migration: Create student_marks and grade_scales tables

use sea_orm_migration::prelude::*;

use super::m20260815_000001_create_schools::Schools;
use super::m20260815_000005_create_students::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentMarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentMarks::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentMarks::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentMarks::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentMarks::Subject).string().not_null())
                    .col(ColumnDef::new(StudentMarks::ExamType).string().not_null())
                    .col(
                        ColumnDef::new(StudentMarks::MarksObtained)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentMarks::TotalMarks).double().not_null())
                    .col(
                        ColumnDef::new(StudentMarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentMarks::Table, StudentMarks::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_marks_student")
                    .table(StudentMarks::Table)
                    .col(StudentMarks::StudentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GradeScales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeScales::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeScales::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeScales::GradeName).string().not_null())
                    .col(
                        ColumnDef::new(GradeScales::MinPercentage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeScales::MaxPercentage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeScales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeScales::Table, GradeScales::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grade_scales_school")
                    .table(GradeScales::Table)
                    .col(GradeScales::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(GradeScales::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StudentMarks::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "student_marks"]
pub enum StudentMarks {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "session_id"]
    SessionId,
    #[iden = "student_id"]
    StudentId,
    Subject,
    #[iden = "exam_type"]
    ExamType,
    #[iden = "marks_obtained"]
    MarksObtained,
    #[iden = "total_marks"]
    TotalMarks,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
#[iden = "grade_scales"]
pub enum GradeScales {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "grade_name"]
    GradeName,
    #[iden = "min_percentage"]
    MinPercentage,
    #[iden = "max_percentage"]
    MaxPercentage,
    #[iden = "created_at"]
    CreatedAt,
}
