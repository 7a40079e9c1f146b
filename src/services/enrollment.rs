//! Session-scoped enrollment records.
//!
//! The placement history lives in `student_enrollments`, one row per
//! (student, session). Whenever a student's current placement triple is
//! fully populated the row is upserted, so repeated syncs are no-ops.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::student_enrollment::EnrollmentStatus;

/// Upsert the enrollment row for the student's current (session, class,
/// section) placement. Does nothing unless session and class are both set.
///
/// Status is reset to `active` and class/section overwritten; calling this
/// twice with the same inputs produces no change.
pub async fn sync_current_placement<C: ConnectionTrait>(
    conn: &C,
    student: &crate::models::student::Model,
) -> Result<()> {
    let (Some(session_id), Some(class_id)) =
        (student.current_session_id, student.current_class_id)
    else {
        return Ok(());
    };

    let now = Utc::now();
    let row = student_enrollment::ActiveModel {
        school_id: Set(student.school_id),
        student_id: Set(student.id),
        session_id: Set(session_id),
        class_id: Set(class_id),
        section_id: Set(student.current_section_id),
        status: Set(EnrollmentStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    StudentEnrollment::insert(row)
        .on_conflict(
            OnConflict::columns([
                student_enrollment::Column::StudentId,
                student_enrollment::Column::SessionId,
            ])
            .update_columns([
                student_enrollment::Column::ClassId,
                student_enrollment::Column::SectionId,
                student_enrollment::Column::Status,
                student_enrollment::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Explicit enrollment status transition (`active -> passed | left`).
/// Never implied by re-enrollment.
pub async fn set_status(
    db: &DbConn,
    school_id: i64,
    enrollment_id: i64,
    status: EnrollmentStatus,
) -> Result<student_enrollment::Model> {
    let enrollment = StudentEnrollment::find_by_id(enrollment_id)
        .filter(student_enrollment::Column::SchoolId.eq(school_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    if status == EnrollmentStatus::Active {
        return Err(AppError::validation(
            "status",
            "enrollments return to active only through re-enrollment",
        ));
    }
    if enrollment.status != EnrollmentStatus::Active {
        return Err(AppError::validation(
            "status",
            "only active enrollments can transition",
        ));
    }

    let mut model: student_enrollment::ActiveModel = enrollment.into();
    model.status = Set(status);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}
