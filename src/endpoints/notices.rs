use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::middleware::roles::{Authenticated, Guarded, NoticesManage};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::notice::{self, Audience};
use crate::models::prelude::*;
use crate::services::audit::RequestMeta;
use crate::services::notices;
use crate::state::AppState;

/// Create notice routes
pub fn notices_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_notices).post(create_notice))
        .route("/feed", get(notice_feed))
        .route("/{notice_id}/toggle-publish", post(toggle_publish))
        .route("/{notice_id}/read", post(mark_read))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub body: String,
    pub target_role: Audience,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub notice_id: i64,
    pub first_read: bool,
}

/// All notices of the school, drafts included (management view).
async fn list_notices(
    guard: Guarded<NoticesManage>,
    State(state): State<AppState>,
) -> Result<Json<Vec<notice::Model>>> {
    let school_id = guard.school_id()?;
    let notices = Notice::find()
        .filter(notice::Column::SchoolId.eq(school_id))
        .order_by_desc(notice::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(notices))
}

/// Published notices visible to the caller's role.
async fn notice_feed(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<notice::Model>>> {
    let school_id = auth.school_id()?;
    let feed = notices::visible_notices(&state.db, school_id, auth.user().role).await?;
    Ok(Json(feed))
}

async fn create_notice(
    guard: Guarded<NoticesManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateNoticeRequest>,
) -> Result<Json<notice::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    let now = Utc::now();
    let created = notice::ActiveModel {
        school_id: Set(school_id),
        title: Set(request.title),
        body: Set(request.body),
        target_role: Set(request.target_role),
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
            AuditAction::NoticeCreated,
            ResourceType::Notice,
            Some(created.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "title": created.title })),
            meta,
        )
        .await;

    Ok(Json(created))
}

async fn toggle_publish(
    guard: Guarded<NoticesManage>,
    State(state): State<AppState>,
    Path(notice_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<notice::Model>> {
    let school_id = guard.school_id()?;
    let updated = notices::toggle_publish(&state.db, school_id, notice_id).await?;

    state
        .audit
        .record(
            AuditAction::NoticePublishToggled,
            ResourceType::Notice,
            Some(updated.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "is_published": updated.is_published })),
            meta,
        )
        .await;

    Ok(Json(updated))
}

async fn mark_read(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(notice_id): Path<i64>,
    meta: RequestMeta,
) -> Result<Json<MarkReadResponse>> {
    let school_id = auth.school_id()?;
    let first_read = notices::mark_read(&state.db, school_id, auth.user(), notice_id).await?;

    // Only the first read lands in the audit trail; re-reads are no-ops.
    if first_read {
        state
            .audit
            .record(
                AuditAction::NoticeRead,
                ResourceType::Notice,
                Some(notice_id.to_string()),
                Some(auth.user()),
                None,
                meta,
            )
            .await;
    }

    Ok(Json(MarkReadResponse {
        notice_id,
        first_read,
    }))
}
