use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{Guarded, StudentsManage, StudentsView};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::student_enrollment::EnrollmentStatus;
use crate::models::user::Role;
use crate::models::{academic_session, school_class, section, student, student_enrollment, user};
use crate::services::audit::RequestMeta;
use crate::services::enrollment;
use crate::state::AppState;

/// Create student routes
pub fn students_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/{student_id}", get(get_student).patch(update_student))
        .route("/{student_id}/enrollments", get(list_enrollments))
        .route(
            "/enrollments/{enrollment_id}/status",
            post(change_enrollment_status),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub admission_number: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub current_session_id: Option<i64>,
    pub current_class_id: Option<i64>,
    pub current_section_id: Option<i64>,
    pub parent_user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub guardian_name: Option<String>,
    pub current_session_id: Option<i64>,
    pub current_class_id: Option<i64>,
    pub current_section_id: Option<i64>,
    pub parent_user_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}

/// Reject any placement reference that does not resolve inside the acting
/// school. A cross-school id is indistinguishable from a bad one.
async fn check_placement<C: ConnectionTrait>(
    conn: &C,
    school_id: i64,
    session_id: Option<i64>,
    class_id: Option<i64>,
    section_id: Option<i64>,
    parent_user_id: Option<i64>,
) -> Result<()> {
    if let Some(id) = session_id {
        AcademicSession::find_by_id(id)
            .filter(academic_session::Column::SchoolId.eq(school_id))
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("current_session_id"))?;
    }
    if let Some(id) = class_id {
        SchoolClass::find_by_id(id)
            .filter(school_class::Column::SchoolId.eq(school_id))
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("current_class_id"))?;
    }
    if let Some(id) = section_id {
        Section::find_by_id(id)
            .filter(section::Column::SchoolId.eq(school_id))
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("current_section_id"))?;
    }
    if let Some(id) = parent_user_id {
        User::find_by_id(id)
            .filter(user::Column::SchoolId.eq(school_id))
            .filter(user::Column::Role.eq(Role::Parent))
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("parent_user_id"))?;
    }
    Ok(())
}

async fn list_students(
    guard: Guarded<StudentsView>,
    State(state): State<AppState>,
) -> Result<Json<Vec<student::Model>>> {
    let school_id = guard.school_id()?;
    let students = Student::find()
        .filter(student::Column::SchoolId.eq(school_id))
        .order_by_asc(student::Column::AdmissionNumber)
        .all(&state.db)
        .await?;
    Ok(Json(students))
}

async fn get_student(
    guard: Guarded<StudentsView>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<student::Model>> {
    let school_id = guard.school_id()?;
    let found = Student::find_by_id(student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    Ok(Json(found))
}

async fn create_student(
    guard: Guarded<StudentsManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateStudentRequest>,
) -> Result<Json<student::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    check_placement(
        &state.db,
        school_id,
        request.current_session_id,
        request.current_class_id,
        request.current_section_id,
        request.parent_user_id,
    )
    .await?;

    let existing = Student::find()
        .filter(student::Column::AdmissionNumber.eq(&request.admission_number))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::validation("admission_number", "already in use"));
    }

    let created = state
        .db
        .transaction::<_, student::Model, AppError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let created = student::ActiveModel {
                    school_id: Set(school_id),
                    admission_number: Set(request.admission_number),
                    first_name: Set(request.first_name),
                    last_name: Set(request.last_name),
                    date_of_birth: Set(request.date_of_birth),
                    guardian_name: Set(request.guardian_name),
                    current_session_id: Set(request.current_session_id),
                    current_class_id: Set(request.current_class_id),
                    current_section_id: Set(request.current_section_id),
                    parent_user_id: Set(request.parent_user_id),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                enrollment::sync_current_placement(txn, &created).await?;
                Ok(created)
            })
        })
        .await?;

    state
        .audit
        .record(
            AuditAction::StudentCreated,
            ResourceType::Student,
            Some(created.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "admission_number": created.admission_number })),
            meta,
        )
        .await;

    Ok(Json(created))
}

async fn update_student(
    guard: Guarded<StudentsManage>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<student::Model>> {
    let school_id = guard.school_id()?;
    let found = Student::find_by_id(student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    check_placement(
        &state.db,
        school_id,
        request.current_session_id,
        request.current_class_id,
        request.current_section_id,
        request.parent_user_id,
    )
    .await?;

    let updated = state
        .db
        .transaction::<_, student::Model, AppError>(move |txn| {
            Box::pin(async move {
                let mut model: student::ActiveModel = found.into();
                if let Some(first_name) = request.first_name {
                    model.first_name = Set(first_name);
                }
                if let Some(last_name) = request.last_name {
                    model.last_name = Set(Some(last_name));
                }
                if let Some(guardian_name) = request.guardian_name {
                    model.guardian_name = Set(Some(guardian_name));
                }
                if let Some(session_id) = request.current_session_id {
                    model.current_session_id = Set(Some(session_id));
                }
                if let Some(class_id) = request.current_class_id {
                    model.current_class_id = Set(Some(class_id));
                }
                if let Some(section_id) = request.current_section_id {
                    model.current_section_id = Set(Some(section_id));
                }
                if let Some(parent_user_id) = request.parent_user_id {
                    model.parent_user_id = Set(Some(parent_user_id));
                }
                if let Some(is_active) = request.is_active {
                    model.is_active = Set(is_active);
                }
                model.updated_at = Set(Utc::now());
                let updated = model.update(txn).await?;

                enrollment::sync_current_placement(txn, &updated).await?;
                Ok(updated)
            })
        })
        .await?;

    state
        .audit
        .record(
            AuditAction::StudentUpdated,
            ResourceType::Student,
            Some(updated.id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(updated))
}

async fn list_enrollments(
    guard: Guarded<StudentsView>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<student_enrollment::Model>>> {
    let school_id = guard.school_id()?;
    Student::find_by_id(student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let enrollments = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student_id))
        .order_by_desc(student_enrollment::Column::SessionId)
        .all(&state.db)
        .await?;
    Ok(Json(enrollments))
}

async fn change_enrollment_status(
    guard: Guarded<StudentsManage>,
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<EnrollmentStatusRequest>,
) -> Result<Json<student_enrollment::Model>> {
    let school_id = guard.school_id()?;
    let updated = enrollment::set_status(&state.db, school_id, enrollment_id, request.status).await?;

    state
        .audit
        .record(
            AuditAction::EnrollmentStatusChanged,
            ResourceType::Enrollment,
            Some(updated.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "status": updated.status })),
            meta,
        )
        .await;

    Ok(Json(updated))
}
