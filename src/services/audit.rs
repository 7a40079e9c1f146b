//! Best-effort audit trail.
//!
//! Recording is fire-and-forget: a failure to persist the audit row is
//! logged and swallowed, and never aborts the business transaction it
//! accompanies.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::DbConn;
use crate::error::Result;
use crate::models::audit_log::{self, AuditAction, ResourceType};
use crate::models::user;

/// Request metadata captured alongside an audit entry.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub method: Option<String>,
    pub path: Option<String>,
    pub ip_address: Option<String>,
}

/// Audit service for recording state-changing actions
#[derive(Clone)]
pub struct AuditService {
    db: DbConn,
}

impl AuditService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Record an audit event. Never fails: persistence errors are logged
    /// via `tracing::warn!` and dropped.
    pub async fn record(
        &self,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: Option<String>,
        actor: Option<&user::Model>,
        details: Option<serde_json::Value>,
        meta: RequestMeta,
    ) {
        let entry = audit_log::ActiveModel {
            timestamp: Set(chrono::Utc::now()),
            school_id: Set(actor.and_then(|u| u.school_id)),
            user_id: Set(actor.map(|u| u.id)),
            username: Set(actor.map(|u| u.username.clone())),
            action: Set(action.to_string()),
            resource_type: Set(resource_type.to_string()),
            resource_id: Set(resource_id),
            details: Set(details.map(|d| d.to_string())),
            method: Set(meta.method),
            path: Set(meta.path),
            ip_address: Set(meta.ip_address),
            ..Default::default()
        };

        if let Err(e) = entry.insert(&self.db).await {
            tracing::warn!("Failed to persist audit log entry: {}", e);
        }
    }
}

/// Query parameters for fetching audit logs
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
}

/// Paginated audit log response
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub logs: Vec<audit_log::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Get audit logs for one school, with filtering and pagination
pub async fn get_audit_logs(
    db: &DbConn,
    school_id: i64,
    query: AuditLogQuery,
) -> Result<AuditLogResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).min(100);
    let offset = (page - 1) * per_page;

    let mut select =
        audit_log::Entity::find().filter(audit_log::Column::SchoolId.eq(school_id));

    if let Some(user_id) = query.user_id {
        select = select.filter(audit_log::Column::UserId.eq(user_id));
    }

    if let Some(action) = &query.action {
        select = select.filter(audit_log::Column::Action.eq(action.clone()));
    }

    if let Some(resource_type) = &query.resource_type {
        select = select.filter(audit_log::Column::ResourceType.eq(resource_type.clone()));
    }

    let total = select.clone().count(db).await?;

    let logs = select
        .order_by_desc(audit_log::Column::Timestamp)
        .offset(offset)
        .limit(per_page)
        .all(db)
        .await?;

    Ok(AuditLogResponse {
        logs,
        total,
        page,
        per_page,
    })
}
