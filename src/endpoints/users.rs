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
use crate::middleware::roles::{Authenticated, Guarded, UsersManage};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::user::{self, Role};
use crate::services::audit::RequestMeta;
use crate::services::security::hash_password;
use crate::state::AppState;

/// Create users routes
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_current_user))
        .route("/{user_id}", get(get_user).patch(update_user))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    #[validate(email(message = "not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    /// Required for superadmin callers; ignored for school-bound callers.
    pub school_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// Resolve the school a user-management call acts on. School-bound admins
/// always act on their own school; superadmins name one explicitly.
fn acting_school(caller: &user::Model, requested: Option<i64>) -> Result<i64> {
    match caller.school_id {
        Some(id) => Ok(id),
        None => requested.ok_or_else(|| AppError::validation("school_id", "required")),
    }
}

async fn list_users(
    guard: Guarded<UsersManage>,
    State(state): State<AppState>,
) -> Result<Json<Vec<user::Model>>> {
    let school_id = guard.school_id()?;
    let users = User::find()
        .filter(user::Column::SchoolId.eq(school_id))
        .order_by_asc(user::Column::Username)
        .all(&state.db)
        .await?;
    Ok(Json(users))
}

async fn get_current_user(auth: Authenticated) -> Json<user::Model> {
    Json(auth.0)
}

async fn get_user(
    guard: Guarded<UsersManage>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<user::Model>> {
    let school_id = guard.school_id()?;
    let found = User::find_by_id(user_id)
        .filter(user::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(found))
}

async fn create_user(
    guard: Guarded<UsersManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<user::Model>> {
    request.validate()?;

    if request.role == Role::Superadmin {
        return Err(AppError::not_a_valid_choice("role"));
    }

    let school_id = acting_school(guard.user(), request.school_id)?;
    School::find_by_id(school_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("school_id"))?;

    let existing = User::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.email)),
        )
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::validation("username", "already in use"));
    }

    let now = Utc::now();
    let created = user::ActiveModel {
        school_id: Set(Some(school_id)),
        username: Set(request.username),
        email: Set(request.email),
        full_name: Set(request.full_name),
        hashed_password: Set(hash_password(&request.password)?),
        role: Set(request.role),
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
            AuditAction::UserCreated,
            ResourceType::User,
            Some(created.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({
                "username": created.username,
                "role": created.role.to_string(),
            })),
            meta,
        )
        .await;

    Ok(Json(created))
}

async fn update_user(
    guard: Guarded<UsersManage>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    meta: RequestMeta,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<user::Model>> {
    let school_id = guard.school_id()?;
    let found = User::find_by_id(user_id)
        .filter(user::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut model: user::ActiveModel = found.into();
    if let Some(full_name) = request.full_name {
        model.full_name = Set(full_name);
    }
    if let Some(is_active) = request.is_active {
        model.is_active = Set(is_active);
    }
    if let Some(password) = request.password {
        if password.len() < 8 {
            return Err(AppError::validation(
                "password",
                "must be at least 8 characters",
            ));
        }
        model.hashed_password = Set(hash_password(&password)?);
    }
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    state
        .audit
        .record(
            AuditAction::UserUpdated,
            ResourceType::User,
            Some(updated.id.to_string()),
            Some(guard.user()),
            None,
            meta,
        )
        .await;

    Ok(Json(updated))
}
