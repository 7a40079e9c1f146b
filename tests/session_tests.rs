//! Academic session lifecycle tests: atomic activation and the
//! single-active-session invariant.

mod common;

use common::{create_test_db, seed_school, seed_session};
use sea_orm::EntityTrait;

use schola::models::prelude::*;
use schola::services::sessions;

#[tokio::test]
async fn activation_deactivates_siblings_and_repoints_school() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let first = seed_session(&db, school.id, "2025-26", true).await;
    let second = seed_session(&db, school.id, "2026-27", false).await;

    let activated = sessions::activate(&db, school.id, second.id).await.unwrap();
    assert!(activated.is_active);

    let first = AcademicSession::find_by_id(first.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!first.is_active);

    let school = School::find_by_id(school.id).one(&db).await.unwrap().unwrap();
    assert_eq!(school.current_session_id, Some(second.id));
}

#[tokio::test]
async fn activation_is_idempotent_for_the_same_target() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", false).await;

    sessions::activate(&db, school.id, session.id).await.unwrap();
    let again = sessions::activate(&db, school.id, session.id).await.unwrap();
    assert!(again.is_active);

    let school = School::find_by_id(school.id).one(&db).await.unwrap().unwrap();
    assert_eq!(school.current_session_id, Some(session.id));
}

#[tokio::test]
async fn activation_is_scoped_to_the_owning_school() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let session_b = seed_session(&db, school_b.id, "2026-27", false).await;

    // School A cannot activate School B's session; B is untouched.
    let err = sessions::activate(&db, school_a.id, session_b.id).await;
    assert!(err.is_err());

    let session_b = AcademicSession::find_by_id(session_b.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!session_b.is_active);
}
