//! Enrollment sync (idempotent upsert) and status transition tests.

mod common;

use common::{create_test_db, seed_class, seed_school, seed_section, seed_session, seed_student};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use schola::models::prelude::*;
use schola::models::student_enrollment::{self, EnrollmentStatus};
use schola::services::enrollment;

async fn placed_student(
    db: &sea_orm::DatabaseConnection,
    school_id: i64,
) -> schola::models::student::Model {
    let session = seed_session(db, school_id, "2026-27", true).await;
    let class = seed_class(db, school_id, "Class 5").await;
    let section = seed_section(db, school_id, class.id, "A").await;
    let student = seed_student(db, school_id, "ADM-001").await;

    let mut model: schola::models::student::ActiveModel = student.into();
    model.current_session_id = Set(Some(session.id));
    model.current_class_id = Set(Some(class.id));
    model.current_section_id = Set(Some(section.id));
    model.update(db).await.unwrap()
}

#[tokio::test]
async fn sync_twice_produces_one_row() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let student = placed_student(&db, school.id).await;

    enrollment::sync_current_placement(&db, &student).await.unwrap();
    enrollment::sync_current_placement(&db, &student).await.unwrap();

    let count = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sync_without_full_placement_is_a_noop() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let student = seed_student(&db, school.id, "ADM-002").await;

    enrollment::sync_current_placement(&db, &student).await.unwrap();

    let count = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn resync_resets_status_to_active_and_overwrites_placement() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let student = placed_student(&db, school.id).await;

    enrollment::sync_current_placement(&db, &student).await.unwrap();
    let row = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    enrollment::set_status(&db, school.id, row.id, EnrollmentStatus::Passed)
        .await
        .unwrap();

    // Moving the student to a new class re-activates the same enrollment row.
    let new_class = seed_class(&db, school.id, "Class 6").await;
    let mut model: schola::models::student::ActiveModel = student.clone().into();
    model.current_class_id = Set(Some(new_class.id));
    model.current_section_id = Set(None);
    let student = model.update(&db).await.unwrap();

    enrollment::sync_current_placement(&db, &student).await.unwrap();

    let row = StudentEnrollment::find_by_id(row.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, EnrollmentStatus::Active);
    assert_eq!(row.class_id, new_class.id);
    assert_eq!(row.section_id, None);
}

#[tokio::test]
async fn status_transitions_are_explicit_and_one_way() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let student = placed_student(&db, school.id).await;
    enrollment::sync_current_placement(&db, &student).await.unwrap();
    let row = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    // Cannot transition to active explicitly.
    assert!(
        enrollment::set_status(&db, school.id, row.id, EnrollmentStatus::Active)
            .await
            .is_err()
    );

    let updated = enrollment::set_status(&db, school.id, row.id, EnrollmentStatus::Left)
        .await
        .unwrap();
    assert_eq!(updated.status, EnrollmentStatus::Left);

    // A non-active enrollment cannot transition again.
    assert!(
        enrollment::set_status(&db, school.id, row.id, EnrollmentStatus::Passed)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn status_change_is_tenant_scoped() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let student = placed_student(&db, school_a.id).await;
    enrollment::sync_current_placement(&db, &student).await.unwrap();
    let row = StudentEnrollment::find()
        .filter(student_enrollment::Column::StudentId.eq(student.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let err = enrollment::set_status(&db, school_b.id, row.id, EnrollmentStatus::Passed).await;
    assert!(err.is_err());
}
