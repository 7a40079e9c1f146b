pub mod attendance;
pub mod audit;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod extractors;
pub mod fees;
pub mod homework;
pub mod marks;
pub mod notices;
pub mod schools;
pub mod sessions;
pub mod students;
pub mod users;

use axum::{middleware as axum_middleware, Router};

use crate::config::CONFIG;
use crate::middleware::{require_auth, security_headers};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", axum::routing::get(health_check))
        .route("/api/version", axum::routing::get(get_version))
        .nest("/auth", auth::auth_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(security_headers))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// API routes under /api/* (protected by auth middleware)
fn api_routes(state: AppState) -> Router {
    Router::new()
        .nest("/schools", schools::schools_routes(state.clone()))
        .nest("/users", users::users_routes(state.clone()))
        .nest("/sessions", sessions::sessions_routes(state.clone()))
        .nest("/classes", classes::classes_routes(state.clone()))
        .nest("/students", students::students_routes(state.clone()))
        .nest("/attendance", attendance::attendance_routes(state.clone()))
        .nest("/homework", homework::homework_routes(state.clone()))
        .nest("/marks", marks::marks_routes(state.clone()))
        .nest("/fees", fees::fees_routes(state.clone()))
        .nest("/notices", notices::notices_routes(state.clone()))
        .nest("/audit", audit::audit_routes(state.clone()))
        .nest("/dashboard", dashboard::dashboard_routes(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": CONFIG.version,
        "backend": "rust"
    }))
}
