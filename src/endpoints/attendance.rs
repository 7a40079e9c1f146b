use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::roles::{AttendanceMark, AttendanceView, Guarded};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{academic_session, school_class, section};
use crate::services::attendance::{self, AttendanceEntry, MonthlyReportRow};
use crate::services::audit::RequestMeta;
use crate::state::AppState;

/// Create attendance routes
pub fn attendance_routes(state: AppState) -> Router {
    Router::new()
        .route("/mark", post(mark_attendance))
        .route("/report", get(monthly_report))
        .route("/students/{student_id}/percentage", get(student_percentage))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MarkRequest {
    pub session_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Serialize)]
pub struct MarkResponse {
    pub marked: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub session_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct PercentageParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize)]
pub struct PercentageResponse {
    pub student_id: i64,
    pub year: i32,
    pub month: u32,
    pub percentage: f64,
}

/// The session, class and section (when given) must all resolve within the
/// acting school before any row is written or read.
async fn check_register_scope(
    state: &AppState,
    school_id: i64,
    session_id: i64,
    class_id: i64,
    section_id: Option<i64>,
) -> Result<()> {
    AcademicSession::find_by_id(session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("session_id"))?;

    SchoolClass::find_by_id(class_id)
        .filter(school_class::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("class_id"))?;

    if let Some(section_id) = section_id {
        Section::find_by_id(section_id)
            .filter(section::Column::SchoolId.eq(school_id))
            .filter(section::Column::ClassId.eq(class_id))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("section_id"))?;
    }
    Ok(())
}

async fn mark_attendance(
    guard: Guarded<AttendanceMark>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<MarkRequest>,
) -> Result<Json<MarkResponse>> {
    let school_id = guard.school_id()?;
    check_register_scope(
        &state,
        school_id,
        request.session_id,
        request.class_id,
        request.section_id,
    )
    .await?;

    let marked = attendance::mark(
        &state.db,
        school_id,
        request.session_id,
        request.class_id,
        request.section_id,
        request.date,
        request.entries,
        Some(guard.user().id),
    )
    .await?;

    state
        .audit
        .record(
            AuditAction::AttendanceMarked,
            ResourceType::Attendance,
            None,
            Some(guard.user()),
            Some(serde_json::json!({
                "class_id": request.class_id,
                "date": request.date,
                "marked": marked,
            })),
            meta,
        )
        .await;

    Ok(Json(MarkResponse { marked }))
}

async fn monthly_report(
    guard: Guarded<AttendanceView>,
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<MonthlyReportRow>>> {
    let school_id = guard.school_id()?;
    check_register_scope(
        &state,
        school_id,
        params.session_id,
        params.class_id,
        params.section_id,
    )
    .await?;

    let report = attendance::monthly_report(
        &state.db,
        school_id,
        params.session_id,
        params.class_id,
        params.section_id,
        params.year,
        params.month,
    )
    .await?;
    Ok(Json(report))
}

async fn student_percentage(
    guard: Guarded<AttendanceView>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<PercentageParams>,
) -> Result<Json<PercentageResponse>> {
    let school_id = guard.school_id()?;
    Student::find_by_id(student_id)
        .filter(crate::models::student::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let percentage =
        attendance::percentage_for(&state.db, school_id, student_id, params.year, params.month)
            .await?;

    Ok(Json(PercentageResponse {
        student_id,
        year: params.year,
        month: params.month,
        percentage,
    }))
}
