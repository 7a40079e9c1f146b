use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{AcademicsManage, Authenticated, Guarded};
use crate::models::academic_session;
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::services::audit::RequestMeta;
use crate::services::sessions;
use crate::state::AppState;

/// Create academic-session routes
pub fn sessions_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/{session_id}",
            get(get_session).patch(update_session).delete(delete_session),
        )
        .route("/{session_id}/activate", post(activate_session))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

async fn list_sessions(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<academic_session::Model>>> {
    let school_id = auth.school_id()?;
    let sessions = AcademicSession::find()
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .order_by_desc(academic_session::Column::StartDate)
        .all(&state.db)
        .await?;
    Ok(Json(sessions))
}

async fn get_session(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<academic_session::Model>> {
    let school_id = auth.school_id()?;
    let session = AcademicSession::find_by_id(session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;
    Ok(Json(session))
}

async fn create_session(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<academic_session::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    if request.end_date <= request.start_date {
        return Err(AppError::validation(
            "end_date",
            "must be after start_date",
        ));
    }

    // Sessions start inactive; activation is a separate explicit step.
    let session = academic_session::ActiveModel {
        school_id: Set(school_id),
        name: Set(request.name),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        is_active: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::SessionCreated,
            ResourceType::Session,
            Some(session.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "name": session.name })),
            meta,
        )
        .await;

    Ok(Json(session))
}

async fn update_session(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<academic_session::Model>> {
    let school_id = guard.school_id()?;
    let session = AcademicSession::find_by_id(session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let mut model: academic_session::ActiveModel = session.into();
    if let Some(name) = request.name {
        model.name = Set(name);
    }
    if let Some(start_date) = request.start_date {
        model.start_date = Set(start_date);
    }
    if let Some(end_date) = request.end_date {
        model.end_date = Set(end_date);
    }
    let session = model.update(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::SessionUpdated,
            ResourceType::Session,
            Some(session.id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(session))
}

async fn delete_session(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<serde_json::Value>> {
    let school_id = guard.school_id()?;
    let session = AcademicSession::find_by_id(session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    if session.is_active {
        return Err(AppError::BadRequest(
            "Cannot delete the active session".to_string(),
        ));
    }

    let id = session.id;
    session.delete(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::SessionDeleted,
            ResourceType::Session,
            Some(id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(serde_json::json!({ "message": "Session deleted" })))
}

async fn activate_session(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<academic_session::Model>> {
    let school_id = guard.school_id()?;
    let session = sessions::activate(&state.db, school_id, session_id).await?;

    state
        .audit
        .record(
            AuditAction::SessionActivated,
            ResourceType::Session,
            Some(session.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "name": session.name })),
            meta,
        )
        .await;

    Ok(Json(session))
}
