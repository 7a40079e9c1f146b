use axum::{extract::State, routing::post, Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user::{self, Role};
use crate::services::audit::RequestMeta;
use crate::services::security::{create_access_token, verify_password};
use crate::state::AppState;

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub school_id: Option<i64>,
}

/// Login with username (or email) and password, returns a Bearer token
async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    use crate::models::audit_log::{AuditAction, ResourceType};

    let found_user = User::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.username)),
        )
        .one(&state.db)
        .await?;

    let Some(found_user) = found_user else {
        state
            .audit
            .record(
                AuditAction::LoginFailed,
                ResourceType::User,
                None,
                None,
                Some(serde_json::json!({ "username": request.username })),
                meta,
            )
            .await;
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    if !found_user.is_active || !verify_password(&request.password, &found_user.hashed_password) {
        state
            .audit
            .record(
                AuditAction::LoginFailed,
                ResourceType::User,
                Some(found_user.id.to_string()),
                None,
                Some(serde_json::json!({ "username": request.username })),
                meta,
            )
            .await;
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = create_access_token(&found_user)?;

    state
        .audit
        .record(
            AuditAction::Login,
            ResourceType::User,
            Some(found_user.id.to_string()),
            Some(&found_user),
            None,
            meta,
        )
        .await;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user_id: found_user.id,
        username: found_user.username,
        role: found_user.role,
        school_id: found_user.school_id,
    }))
}
