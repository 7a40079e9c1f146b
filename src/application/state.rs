use sea_orm::DatabaseConnection;

use crate::services::audit::AuditService;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub audit: AuditService,
}

impl AppState {
    pub fn new(db: DbConn) -> Self {
        let audit = AuditService::new(db.clone());
        Self { db, audit }
    }
}
