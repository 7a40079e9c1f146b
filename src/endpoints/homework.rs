use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{Authenticated, Guarded, HomeworkManage};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::user::Role;
use crate::models::{academic_session, homework, section, student};
use crate::services::audit::RequestMeta;
use crate::state::AppState;

/// Create homework routes
pub fn homework_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_homework).post(create_homework))
        .route("/feed", get(parent_feed))
        .route(
            "/{homework_id}",
            axum::routing::patch(update_homework).delete(delete_homework),
        )
        .route("/{homework_id}/toggle-publish", post(toggle_publish))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHomeworkRequest {
    pub session_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHomeworkRequest {
    pub subject: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

async fn list_homework(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<homework::Model>>> {
    // The full list includes drafts; parents only ever see published
    // homework through the placement-filtered feed.
    if auth.user().role == Role::Parent {
        return Err(AppError::Forbidden(
            "Parent accounts use the homework feed".to_string(),
        ));
    }
    let school_id = auth.school_id()?;
    let homework = Homework::find()
        .filter(homework::Column::SchoolId.eq(school_id))
        .order_by_desc(homework::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(homework))
}

/// Published homework for the children of the calling parent, scoped to
/// each child's current class and section.
async fn parent_feed(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<homework::Model>>> {
    let user = auth.user();
    if user.role != Role::Parent {
        return Err(AppError::Forbidden(
            "Only parent accounts have a homework feed".to_string(),
        ));
    }
    let school_id = auth.school_id()?;

    let children = Student::find()
        .filter(student::Column::SchoolId.eq(school_id))
        .filter(student::Column::ParentUserId.eq(user.id))
        .all(&state.db)
        .await?;

    let mut placements = Condition::any();
    for child in &children {
        let Some(class_id) = child.current_class_id else {
            continue;
        };
        let mut cond = Condition::all().add(homework::Column::ClassId.eq(class_id));
        if let Some(section_id) = child.current_section_id {
            cond = cond.add(
                Condition::any()
                    .add(homework::Column::SectionId.is_null())
                    .add(homework::Column::SectionId.eq(section_id)),
            );
        }
        placements = placements.add(cond);
    }
    if placements.is_empty() {
        return Ok(Json(vec![]));
    }

    let feed = Homework::find()
        .filter(homework::Column::SchoolId.eq(school_id))
        .filter(homework::Column::IsPublished.eq(true))
        .filter(placements)
        .order_by_desc(homework::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(feed))
}

async fn create_homework(
    guard: Guarded<HomeworkManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateHomeworkRequest>,
) -> Result<Json<homework::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    AcademicSession::find_by_id(request.session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("session_id"))?;

    SchoolClass::find_by_id(request.class_id)
        .filter(crate::models::school_class::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("class_id"))?;

    if let Some(section_id) = request.section_id {
        Section::find_by_id(section_id)
            .filter(section::Column::SchoolId.eq(school_id))
            .filter(section::Column::ClassId.eq(request.class_id))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_a_valid_choice("section_id"))?;
    }

    let now = Utc::now();
    let created = homework::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(request.session_id),
        class_id: Set(request.class_id),
        section_id: Set(request.section_id),
        subject: Set(request.subject),
        title: Set(request.title),
        description: Set(request.description),
        due_date: Set(request.due_date),
        is_published: Set(false),
        created_by: Set(Some(guard.user().id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::HomeworkCreated,
            ResourceType::Homework,
            Some(created.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "title": created.title })),
            meta,
        )
        .await;

    Ok(Json(created))
}

async fn update_homework(
    guard: Guarded<HomeworkManage>,
    State(state): State<AppState>,
    Path(homework_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<UpdateHomeworkRequest>,
) -> Result<Json<homework::Model>> {
    let school_id = guard.school_id()?;
    let found = Homework::find_by_id(homework_id)
        .filter(homework::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Homework not found".to_string()))?;

    let mut model: homework::ActiveModel = found.into();
    if let Some(subject) = request.subject {
        model.subject = Set(subject);
    }
    if let Some(title) = request.title {
        model.title = Set(title);
    }
    if let Some(description) = request.description {
        model.description = Set(Some(description));
    }
    if let Some(due_date) = request.due_date {
        model.due_date = Set(Some(due_date));
    }
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::HomeworkUpdated,
            ResourceType::Homework,
            Some(updated.id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(updated))
}

async fn delete_homework(
    guard: Guarded<HomeworkManage>,
    State(state): State<AppState>,
    Path(homework_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<serde_json::Value>> {
    let school_id = guard.school_id()?;
    let found = Homework::find_by_id(homework_id)
        .filter(homework::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Homework not found".to_string()))?;

    let id = found.id;
    found.delete(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::HomeworkDeleted,
            ResourceType::Homework,
            Some(id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(serde_json::json!({ "message": "Homework deleted" })))
}

async fn toggle_publish(
    guard: Guarded<HomeworkManage>,
    State(state): State<AppState>,
    Path(homework_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<homework::Model>> {
    let school_id = guard.school_id()?;
    let found = Homework::find_by_id(homework_id)
        .filter(homework::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Homework not found".to_string()))?;

    let next = !found.is_published;
    let mut model: homework::ActiveModel = found.into();
    model.is_published = Set(next);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::HomeworkPublishToggled,
            ResourceType::Homework,
            Some(updated.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "is_published": updated.is_published })),
            meta,
        )
        .await;

    Ok(Json(updated))
}
