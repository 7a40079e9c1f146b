use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::middleware::roles::{AuditView, Guarded};
use crate::services::audit::{get_audit_logs, AuditLogQuery, AuditLogResponse};
use crate::state::AppState;

/// Create audit log routes
pub fn audit_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_audit_logs))
        .with_state(state)
}

/// List the acting school's audit trail, filtered and paginated.
async fn list_audit_logs(
    guard: Guarded<AuditView>,
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogResponse>> {
    let school_id = guard.school_id()?;
    let response = get_audit_logs(&state.db, school_id, query).await?;
    Ok(Json(response))
}
