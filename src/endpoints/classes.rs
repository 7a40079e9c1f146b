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
use crate::middleware::roles::{AcademicsManage, Authenticated, Guarded};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::user::Role;
use crate::models::{school_class, section, user};
use crate::services::audit::RequestMeta;
use crate::state::AppState;

/// Create class and section routes
pub fn classes_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route(
            "/{class_id}/sections",
            get(list_sections).post(create_section),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub session_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSectionRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub class_teacher_id: Option<i64>,
}

async fn list_classes(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<school_class::Model>>> {
    let school_id = auth.school_id()?;
    let classes = SchoolClass::find()
        .filter(school_class::Column::SchoolId.eq(school_id))
        .order_by_asc(school_class::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(classes))
}

async fn create_class(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateClassRequest>,
) -> Result<Json<school_class::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    if let Some(session_id) = request.session_id {
        AcademicSession::find_by_id(session_id)
            .filter(crate::models::academic_session::Column::SchoolId.eq(school_id))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("session_id"))?;
    }

    let class = school_class::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(request.session_id),
        name: Set(request.name),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::ClassCreated,
            ResourceType::Class,
            Some(class.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "name": class.name })),
            meta,
        )
        .await;

    Ok(Json(class))
}

async fn list_sections(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> Result<Json<Vec<section::Model>>> {
    let school_id = auth.school_id()?;
    SchoolClass::find_by_id(class_id)
        .filter(school_class::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

    let sections = Section::find()
        .filter(section::Column::ClassId.eq(class_id))
        .order_by_asc(section::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(sections))
}

async fn create_section(
    guard: Guarded<AcademicsManage>,
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<CreateSectionRequest>,
) -> Result<Json<section::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    SchoolClass::find_by_id(class_id)
        .filter(school_class::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

    // The class teacher must be a teacher of the same school.
    if let Some(teacher_id) = request.class_teacher_id {
        User::find_by_id(teacher_id)
            .filter(user::Column::SchoolId.eq(school_id))
            .filter(user::Column::Role.eq(Role::Teacher))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("class_teacher_id"))?;
    }

    let created = section::ActiveModel {
        school_id: Set(school_id),
        class_id: Set(class_id),
        name: Set(request.name),
        class_teacher_id: Set(request.class_teacher_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::SectionCreated,
            ResourceType::Section,
            Some(created.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "class_id": class_id, "name": created.name })),
            meta,
        )
        .await;

    Ok(Json(created))
}
