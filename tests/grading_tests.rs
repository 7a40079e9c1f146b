//! Grade lookup and report-card aggregation tests.

mod common;

use chrono::Utc;
use common::{create_test_db, seed_school, seed_session, seed_student};
use sea_orm::{ActiveModelTrait, Set};

use schola::models::{grade_scale, student_mark};
use schola::services::grading::{self, ResultStatus};

async fn seed_scale(
    db: &sea_orm::DatabaseConnection,
    school_id: i64,
    grade: &str,
    min: f64,
    max: f64,
) {
    grade_scale::ActiveModel {
        school_id: Set(school_id),
        grade_name: Set(grade.to_string()),
        min_percentage: Set(min),
        max_percentage: Set(max),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

async fn seed_mark(
    db: &sea_orm::DatabaseConnection,
    school_id: i64,
    session_id: i64,
    student_id: i64,
    subject: &str,
    exam_type: &str,
    obtained: f64,
    total: f64,
) {
    student_mark::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(session_id),
        student_id: Set(student_id),
        subject: Set(subject.to_string()),
        exam_type: Set(exam_type.to_string()),
        marks_obtained: Set(obtained),
        total_marks: Set(total),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn grade_lookup_is_school_scoped() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    seed_scale(&db, school_a.id, "A", 80.0, 100.0).await;

    assert_eq!(
        grading::grade_for(&db, school_a.id, 90.0).await.unwrap(),
        Some("A".to_string())
    );
    // School B has no scales: sentinel, not an error.
    assert_eq!(grading::grade_for(&db, school_b.id, 90.0).await.unwrap(), None);
}

#[tokio::test]
async fn report_card_aggregates_and_passes_at_threshold() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let student = seed_student(&db, school.id, "ADM-001").await;
    seed_scale(&db, school.id, "A", 80.0, 100.0).await;
    seed_scale(&db, school.id, "B", 60.0, 79.99).await;
    seed_scale(&db, school.id, "C", 40.0, 59.99).await;

    seed_mark(&db, school.id, session.id, student.id, "Maths", "final", 90.0, 100.0).await;
    seed_mark(&db, school.id, session.id, student.id, "English", "final", 50.0, 100.0).await;

    let card = grading::report_card(&db, school.id, student.id, Some("final".to_string()))
        .await
        .unwrap();
    assert_eq!(card.subjects.len(), 2);
    assert_eq!(card.total_obtained, 140.0);
    assert_eq!(card.total_max, 200.0);
    assert_eq!(card.overall_percentage, 70.0);
    assert_eq!(card.overall_grade, Some("B".to_string()));
    assert_eq!(card.status, ResultStatus::Pass);

    let maths = card.subjects.iter().find(|s| s.subject == "Maths").unwrap();
    assert_eq!(maths.grade, Some("A".to_string()));
}

#[tokio::test]
async fn report_card_with_no_marks_is_zero_and_fail() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let _session = seed_session(&db, school.id, "2026-27", true).await;
    let student = seed_student(&db, school.id, "ADM-001").await;

    let card = grading::report_card(&db, school.id, student.id, None).await.unwrap();
    assert!(card.subjects.is_empty());
    assert_eq!(card.overall_percentage, 0.0);
    assert_eq!(card.overall_grade, None);
    assert_eq!(card.status, ResultStatus::Fail);
}

#[tokio::test]
async fn fail_below_threshold() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let student = seed_student(&db, school.id, "ADM-001").await;

    seed_mark(&db, school.id, session.id, student.id, "Maths", "final", 39.0, 100.0).await;

    let card = grading::report_card(&db, school.id, student.id, None).await.unwrap();
    assert_eq!(card.status, ResultStatus::Fail);
}

#[tokio::test]
async fn report_card_is_tenant_scoped() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let student_b = seed_student(&db, school_b.id, "ADM-900").await;

    // School A asking for School B's student reads as not found.
    let result = grading::report_card(&db, school_a.id, student_b.id, None).await;
    assert!(result.is_err());
}
