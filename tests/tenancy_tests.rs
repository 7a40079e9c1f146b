//! Cross-tenant isolation and role-gate tests over the real router.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::util::ServiceExt; // for `oneshot`

use common::{
    create_test_state, seed_class, seed_school, seed_session, seed_student, seed_user, token_for,
};
use schola::endpoints::create_router;
use schola::models::prelude::*;
use schola::models::user::Role;

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn foreign_students_read_as_not_found() {
    let state = create_test_state().await;
    let school_a = seed_school(&state.db, "Alpha", "AL").await;
    let school_b = seed_school(&state.db, "Beta", "BT").await;
    let admin_a = seed_user(&state.db, Some(school_a.id), "admin-a", Role::Schooladmin).await;
    let student_b = seed_student(&state.db, school_b.id, "ADM-900").await;
    let token = token_for(&admin_a);

    // Not forbidden: existence must not leak across tenants.
    let app = create_router(state);
    let response = app
        .oneshot(get(&format!("/api/students/{}", student_b.id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_gate_rejects_before_any_side_effect() {
    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    let session = seed_session(&state.db, school.id, "2026-27", true).await;
    let class = seed_class(&state.db, school.id, "Class 5").await;
    let student = seed_student(&state.db, school.id, "ADM-001").await;
    let parent = seed_user(&state.db, Some(school.id), "parent1", Role::Parent).await;
    let token = token_for(&parent);

    let body = format!(
        r#"{{"session_id": {}, "class_id": {}, "date": "2026-07-01",
            "entries": [{{"student_id": {}, "status": "present"}}]}}"#,
        session.id, class.id, student.id
    );
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/attendance/mark", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let count = StudentAttendance::find().count(&state.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn invalid_attendance_status_rejects_the_batch() {
    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    let session = seed_session(&state.db, school.id, "2026-27", true).await;
    let class = seed_class(&state.db, school.id, "Class 5").await;
    let student = seed_student(&state.db, school.id, "ADM-001").await;
    let teacher = seed_user(&state.db, Some(school.id), "teacher1", Role::Teacher).await;
    let token = token_for(&teacher);

    let body = format!(
        r#"{{"session_id": {}, "class_id": {}, "date": "2026-07-01",
            "entries": [{{"student_id": {}, "status": "present"}},
                        {{"student_id": {}, "status": "vacationing"}}]}}"#,
        session.id, class.id, student.id, student.id
    );
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/attendance/mark", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let count = StudentAttendance::find().count(&state.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn foreign_session_refs_are_validation_errors() {
    let state = create_test_state().await;
    let school_a = seed_school(&state.db, "Alpha", "AL").await;
    let school_b = seed_school(&state.db, "Beta", "BT").await;
    let session_b = seed_session(&state.db, school_b.id, "2026-27", true).await;
    let class_a = seed_class(&state.db, school_a.id, "Class 5").await;
    let student_a = seed_student(&state.db, school_a.id, "ADM-001").await;
    let admin_a = seed_user(&state.db, Some(school_a.id), "admin-a", Role::Schooladmin).await;
    let token = token_for(&admin_a);

    // Attendance keyed to another school's session must not persist.
    let body = format!(
        r#"{{"session_id": {}, "class_id": {}, "date": "2026-07-01",
            "entries": [{{"student_id": {}, "status": "present"}}]}}"#,
        session_b.id, class_a.id, student_a.id
    );
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/attendance/mark", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(StudentAttendance::find().count(&state.db).await.unwrap(), 0);

    // Same for marks.
    let body = format!(
        r#"{{"session_id": {}, "student_id": {}, "subject": "Math",
            "exam_type": "midterm", "marks_obtained": 40.0, "total_marks": 50.0}}"#,
        session_b.id, student_a.id
    );
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/marks", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(StudentMark::find().count(&state.db).await.unwrap(), 0);

    // And homework.
    let body = format!(
        r#"{{"session_id": {}, "class_id": {}, "subject": "Math", "title": "Fractions"}}"#,
        session_b.id, class_a.id
    );
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/homework", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(Homework::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn parents_never_see_homework_drafts() {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    let session = seed_session(&state.db, school.id, "2026-27", true).await;
    let class = seed_class(&state.db, school.id, "Class 5").await;
    let parent = seed_user(&state.db, Some(school.id), "parent1", Role::Parent).await;

    let mut child: schola::models::student::ActiveModel =
        seed_student(&state.db, school.id, "ADM-001").await.into();
    child.current_session_id = Set(Some(session.id));
    child.current_class_id = Set(Some(class.id));
    child.parent_user_id = Set(Some(parent.id));
    child.update(&state.db).await.unwrap();

    let now = Utc::now();
    schola::models::homework::ActiveModel {
        school_id: Set(school.id),
        session_id: Set(session.id),
        class_id: Set(class.id),
        section_id: Set(None),
        subject: Set("Math".to_string()),
        title: Set("Draft: surprise quiz".to_string()),
        description: Set(None),
        due_date: Set(None),
        is_published: Set(false),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap();

    let token = token_for(&parent);

    // The general list carries drafts; parents are pointed at the feed.
    let app = create_router(state.clone());
    let response = app.oneshot(get("/api/homework", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The feed is placement-scoped and published-only.
    let app = create_router(state);
    let response = app.oneshot(get("/api/homework/feed", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let feed: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn mutation_endpoints_reject_read_methods() {
    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    let admin = seed_user(&state.db, Some(school.id), "admin1", Role::Schooladmin).await;
    let token = token_for(&admin);

    let app = create_router(state.clone());
    let response = app
        .oneshot(get("/api/notices/1/read", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let app = create_router(state);
    let response = app
        .oneshot(get("/api/notices/1/toggle-publish", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn school_management_is_superadmin_only() {
    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    let admin = seed_user(&state.db, Some(school.id), "admin1", Role::Schooladmin).await;
    let root = seed_user(&state.db, None, "root", Role::Superadmin).await;

    let body = r#"{"name": "New School", "code": "NS"}"#;
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/schools", &token_for(&admin), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/schools", &token_for(&root), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(School::find().count(&state.db).await.unwrap(), 2);
}

#[tokio::test]
async fn superadmin_has_no_implicit_school_scope() {
    let state = create_test_state().await;
    let school = seed_school(&state.db, "Hill View", "HV").await;
    seed_student(&state.db, school.id, "ADM-001").await;
    let root = seed_user(&state.db, None, "root", Role::Superadmin).await;

    // School-scoped listings require a school-bound account.
    let app = create_router(state);
    let response = app
        .oneshot(get("/api/students", &token_for(&root)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cross_tenant_fee_collection_is_a_validation_error() {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    let state = create_test_state().await;
    let school_a = seed_school(&state.db, "Alpha", "AL").await;
    let school_b = seed_school(&state.db, "Beta", "BT").await;
    let session_b = seed_session(&state.db, school_b.id, "2026-27", true).await;
    let class_b = seed_class(&state.db, school_b.id, "Class 5").await;
    let student_b = seed_student(&state.db, school_b.id, "ADM-900").await;
    let accountant_a =
        seed_user(&state.db, Some(school_a.id), "acct-a", Role::Accountant).await;

    let structure = schola::models::fee_structure::ActiveModel {
        school_id: Set(school_b.id),
        session_id: Set(session_b.id),
        class_id: Set(class_b.id),
        name: Set("Tuition".to_string()),
        amount: Set(1000.0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap();
    let fee_b = schola::services::fees::assign(
        &state.db,
        school_b.id,
        student_b.id,
        structure.id,
        0.0,
    )
    .await
    .unwrap();

    let body = format!(r#"{{"student_fee_id": {}, "amount": 100.0}}"#, fee_b.id);
    let app = create_router(state.clone());
    let response = app
        .oneshot(post_json("/api/fees/collect", &token_for(&accountant_a), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(FeePayment::find().count(&state.db).await.unwrap(), 0);
}
