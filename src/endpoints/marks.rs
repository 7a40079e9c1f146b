use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{Guarded, MarksManage, MarksView};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::user::Role;
use crate::models::{academic_session, grade_scale, student, student_mark};
use crate::services::audit::RequestMeta;
use crate::services::grading::{self, ReportCard};
use crate::state::AppState;

/// Create marks and grade-scale routes
pub fn marks_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(record_marks))
        .route("/scales", get(list_grade_scales).post(create_grade_scale))
        .route("/scales/{scale_id}", axum::routing::delete(delete_grade_scale))
        .route("/students/{student_id}/report-card", get(report_card))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordMarksRequest {
    pub session_id: i64,
    pub student_id: i64,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub exam_type: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub marks_obtained: f64,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub total_marks: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGradeScaleRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub grade_name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub min_percentage: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub max_percentage: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReportCardParams {
    pub exam_type: Option<String>,
}

async fn record_marks(
    guard: Guarded<MarksManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<RecordMarksRequest>,
) -> Result<Json<student_mark::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    AcademicSession::find_by_id(request.session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("session_id"))?;

    Student::find_by_id(request.student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("student_id"))?;

    let mark = student_mark::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(request.session_id),
        student_id: Set(request.student_id),
        subject: Set(request.subject),
        exam_type: Set(request.exam_type),
        marks_obtained: Set(request.marks_obtained),
        total_marks: Set(request.total_marks),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::MarksRecorded,
            ResourceType::Mark,
            Some(mark.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({
                "student_id": mark.student_id,
                "subject": mark.subject,
                "exam_type": mark.exam_type,
            })),
            meta,
        )
        .await;

    Ok(Json(mark))
}

async fn list_grade_scales(
    guard: Guarded<MarksView>,
    State(state): State<AppState>,
) -> Result<Json<Vec<grade_scale::Model>>> {
    let school_id = guard.school_id()?;
    let scales = GradeScale::find()
        .filter(grade_scale::Column::SchoolId.eq(school_id))
        .order_by_desc(grade_scale::Column::MinPercentage)
        .all(&state.db)
        .await?;
    Ok(Json(scales))
}

async fn create_grade_scale(
    guard: Guarded<MarksManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateGradeScaleRequest>,
) -> Result<Json<grade_scale::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    if request.max_percentage < request.min_percentage {
        return Err(AppError::validation(
            "max_percentage",
            "must not be below min_percentage",
        ));
    }

    // Gaps and overlaps between scales are allowed; lookup resolves
    // overlaps in favor of the highest min_percentage.
    let scale = grade_scale::ActiveModel {
        school_id: Set(school_id),
        grade_name: Set(request.grade_name),
        min_percentage: Set(request.min_percentage),
        max_percentage: Set(request.max_percentage),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::GradeScaleCreated,
            ResourceType::GradeScale,
            Some(scale.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "grade_name": scale.grade_name })),
            meta,
        )
        .await;

    Ok(Json(scale))
}

async fn delete_grade_scale(
    guard: Guarded<MarksManage>,
    State(state): State<AppState>,
    Path(scale_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<serde_json::Value>> {
    let school_id = guard.school_id()?;
    let scale = GradeScale::find_by_id(scale_id)
        .filter(grade_scale::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Grade scale not found".to_string()))?;

    let id = scale.id;
    scale.delete(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::GradeScaleDeleted,
            ResourceType::GradeScale,
            Some(id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(serde_json::json!({ "message": "Grade scale deleted" })))
}

async fn report_card(
    guard: Guarded<MarksView>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<ReportCardParams>,
) -> Result<Json<ReportCard>> {
    let school_id = guard.school_id()?;

    // Parents only see their own children; everyone else sees the whole
    // school. A foreign child reads as absent, not forbidden.
    if guard.user().role == Role::Parent {
        Student::find_by_id(student_id)
            .filter(student::Column::SchoolId.eq(school_id))
            .filter(student::Column::ParentUserId.eq(guard.user().id))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    }

    let card = grading::report_card(&state.db, school_id, student_id, params.exam_type).await?;
    Ok(Json(card))
}
