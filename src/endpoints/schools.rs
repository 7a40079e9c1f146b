use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{Guarded, PlatformManage};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::school;
use crate::services::audit::RequestMeta;
use crate::state::AppState;

/// Create schools routes (platform administration)
pub fn schools_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_schools).post(create_school))
        .route("/{school_id}", get(get_school).patch(update_school))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSchoolRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

async fn list_schools(
    _guard: Guarded<PlatformManage>,
    State(state): State<AppState>,
) -> Result<Json<Vec<school::Model>>> {
    let schools = School::find()
        .order_by_asc(school::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(schools))
}

async fn get_school(
    _guard: Guarded<PlatformManage>,
    State(state): State<AppState>,
    Path(school_id): Path<i64>,
) -> Result<Json<school::Model>> {
    let school = School::find_by_id(school_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;
    Ok(Json(school))
}

async fn create_school(
    guard: Guarded<PlatformManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateSchoolRequest>,
) -> Result<Json<school::Model>> {
    request.validate()?;

    let existing = School::find()
        .filter(school::Column::Code.eq(&request.code))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::validation("code", "already in use"));
    }

    let now = Utc::now();
    let school = school::ActiveModel {
        name: Set(request.name),
        code: Set(request.code),
        address: Set(request.address),
        phone: Set(request.phone),
        current_session_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::SchoolCreated,
            ResourceType::School,
            Some(school.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "code": school.code })),
            meta,
        )
        .await;

    Ok(Json(school))
}

async fn update_school(
    guard: Guarded<PlatformManage>,
    State(state): State<AppState>,
    Path(school_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<UpdateSchoolRequest>,
) -> Result<Json<school::Model>> {
    let school = School::find_by_id(school_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

    let mut model: school::ActiveModel = school.into();
    if let Some(name) = request.name {
        model.name = Set(name);
    }
    if let Some(address) = request.address {
        model.address = Set(Some(address));
    }
    if let Some(phone) = request.phone {
        model.phone = Set(Some(phone));
    }
    if let Some(is_active) = request.is_active {
        model.is_active = Set(is_active);
    }
    model.updated_at = Set(Utc::now());
    let school = model.update(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::SchoolUpdated,
            ResourceType::School,
            Some(school.id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(school))
}
