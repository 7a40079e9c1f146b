//! Audit trail tests: best-effort recording and scoped retrieval.

mod common;

use common::{create_test_db, seed_school, seed_user};
use sea_orm::{Database, EntityTrait};

use schola::models::audit_log::{AuditAction, ResourceType};
use schola::models::prelude::*;
use schola::models::user::Role;
use schola::services::audit::{get_audit_logs, AuditLogQuery, AuditService, RequestMeta};

#[tokio::test]
async fn record_persists_actor_and_metadata() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let admin = seed_user(&db, Some(school.id), "admin1", Role::Schooladmin).await;
    let audit = AuditService::new(db.clone());

    audit
        .record(
            AuditAction::SessionActivated,
            ResourceType::Session,
            Some("7".to_string()),
            Some(&admin),
            Some(serde_json::json!({ "name": "2026-27" })),
            RequestMeta {
                method: Some("POST".to_string()),
                path: Some("/api/sessions/7/activate".to_string()),
                ip_address: Some("10.0.0.1".to_string()),
            },
        )
        .await;

    let rows = AuditLog::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.action, "session_activated");
    assert_eq!(row.resource_type, "session");
    assert_eq!(row.school_id, Some(school.id));
    assert_eq!(row.username.as_deref(), Some("admin1"));
    assert_eq!(row.method.as_deref(), Some("POST"));
}

#[tokio::test]
async fn record_swallows_persistence_failures() {
    // No migrations: the audit table does not exist, the insert fails, and
    // record must still return normally.
    let broken = Database::connect("sqlite::memory:").await.unwrap();
    let audit = AuditService::new(broken);

    audit
        .record(
            AuditAction::Login,
            ResourceType::User,
            None,
            None,
            None,
            RequestMeta::default(),
        )
        .await;
}

#[tokio::test]
async fn class_and_section_creation_are_audited() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sea_orm::{ColumnTrait, QueryFilter};
    use tower::util::ServiceExt;

    use schola::endpoints::create_router;
    use schola::models::audit_log;
    use schola::state::AppState;

    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let admin = seed_user(&db, Some(school.id), "admin1", Role::Schooladmin).await;
    let token = schola::services::security::create_access_token(&admin).unwrap();
    let state = AppState::new(db.clone());

    let post = |uri: &str, body: &str| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let app = create_router(state.clone());
    let response = app
        .oneshot(post("/api/classes", r#"{"name": "Class 5"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let class = schola::models::prelude::SchoolClass::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let app = create_router(state);
    let response = app
        .oneshot(post(
            &format!("/api/classes/{}/sections", class.id),
            r#"{"name": "A"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for action in ["class_created", "section_created"] {
        let row = AuditLog::find()
            .filter(audit_log::Column::Action.eq(action))
            .one(&db)
            .await
            .unwrap()
            .expect("audit row missing");
        assert_eq!(row.school_id, Some(school.id));
        assert_eq!(row.username.as_deref(), Some("admin1"));
        assert_eq!(row.method.as_deref(), Some("POST"));
    }
}

#[tokio::test]
async fn listing_is_school_scoped_and_filterable() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let admin_a = seed_user(&db, Some(school_a.id), "admin-a", Role::Schooladmin).await;
    let admin_b = seed_user(&db, Some(school_b.id), "admin-b", Role::Schooladmin).await;
    let audit = AuditService::new(db.clone());

    for _ in 0..3 {
        audit
            .record(
                AuditAction::NoticeCreated,
                ResourceType::Notice,
                None,
                Some(&admin_a),
                None,
                RequestMeta::default(),
            )
            .await;
    }
    audit
        .record(
            AuditAction::FeeCollected,
            ResourceType::FeePayment,
            None,
            Some(&admin_b),
            None,
            RequestMeta::default(),
        )
        .await;

    let page = get_audit_logs(
        &db,
        school_a.id,
        AuditLogQuery {
            page: None,
            per_page: None,
            user_id: None,
            action: None,
            resource_type: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(page.total, 3);
    assert!(page.logs.iter().all(|l| l.school_id == Some(school_a.id)));

    let filtered = get_audit_logs(
        &db,
        school_b.id,
        AuditLogQuery {
            page: None,
            per_page: None,
            user_id: None,
            action: Some("fee_collected".to_string()),
            resource_type: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.total, 1);
}
