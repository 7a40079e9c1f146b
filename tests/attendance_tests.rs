//! Attendance batch marking and reporting tests.

mod common;

use chrono::NaiveDate;
use common::{create_test_db, seed_class, seed_school, seed_session, seed_student};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use schola::models::prelude::*;
use schola::models::student_attendance::{self, AttendanceStatus};
use schola::services::attendance::{self, AttendanceEntry};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
}

#[tokio::test]
async fn batch_mark_upserts_and_remark_overwrites() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let class = seed_class(&db, school.id, "Class 5").await;
    let s1 = seed_student(&db, school.id, "ADM-001").await;
    let s2 = seed_student(&db, school.id, "ADM-002").await;

    let marked = attendance::mark(
        &db,
        school.id,
        session.id,
        class.id,
        None,
        day(1),
        vec![
            AttendanceEntry { student_id: s1.id, status: AttendanceStatus::Present },
            AttendanceEntry { student_id: s2.id, status: AttendanceStatus::Absent },
        ],
        None,
    )
    .await
    .unwrap();
    assert_eq!(marked, 2);

    // Re-marking the same day overwrites rather than duplicating.
    attendance::mark(
        &db,
        school.id,
        session.id,
        class.id,
        None,
        day(1),
        vec![AttendanceEntry { student_id: s2.id, status: AttendanceStatus::Present }],
        None,
    )
    .await
    .unwrap();

    let rows = StudentAttendance::find()
        .filter(student_attendance::Column::SchoolId.eq(school.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let s2_row = rows.iter().find(|r| r.student_id == s2.id).unwrap();
    assert_eq!(s2_row.status, AttendanceStatus::Present);
}

#[tokio::test]
async fn foreign_student_rejects_the_whole_batch() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let session = seed_session(&db, school_a.id, "2026-27", true).await;
    let class = seed_class(&db, school_a.id, "Class 5").await;
    let own = seed_student(&db, school_a.id, "ADM-001").await;
    let foreign = seed_student(&db, school_b.id, "ADM-900").await;

    let result = attendance::mark(
        &db,
        school_a.id,
        session.id,
        class.id,
        None,
        day(2),
        vec![
            AttendanceEntry { student_id: own.id, status: AttendanceStatus::Present },
            AttendanceEntry { student_id: foreign.id, status: AttendanceStatus::Present },
        ],
        None,
    )
    .await;
    assert!(result.is_err());

    // All-or-nothing: the valid entry was not written either.
    let count = StudentAttendance::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let class = seed_class(&db, school.id, "Class 5").await;

    let result =
        attendance::mark(&db, school.id, session.id, class.id, None, day(3), vec![], None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn monthly_report_counts_and_percentage() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let class = seed_class(&db, school.id, "Class 5").await;
    let student = seed_student(&db, school.id, "ADM-001").await;

    // Place the student in the class so the report picks them up.
    use sea_orm::{ActiveModelTrait, Set};
    let mut model: schola::models::student::ActiveModel = student.clone().into();
    model.current_class_id = Set(Some(class.id));
    model.update(&db).await.unwrap();

    for (d, status) in [
        (1, AttendanceStatus::Present),
        (2, AttendanceStatus::Present),
        (3, AttendanceStatus::Absent),
    ] {
        attendance::mark(
            &db,
            school.id,
            session.id,
            class.id,
            None,
            day(d),
            vec![AttendanceEntry { student_id: student.id, status }],
            None,
        )
        .await
        .unwrap();
    }

    let report =
        attendance::monthly_report(&db, school.id, session.id, class.id, None, 2026, 7)
            .await
            .unwrap();
    assert_eq!(report.len(), 1);
    let row = &report[0];
    assert_eq!(row.present, 2);
    assert_eq!(row.absent, 1);
    assert_eq!(row.total, 3);
    assert_eq!(row.percentage, 66.67);

    let pct = attendance::percentage_for(&db, school.id, student.id, 2026, 7)
        .await
        .unwrap();
    assert_eq!(pct, 66.67);

    // A month with no rows yields 0, not a division fault.
    let empty = attendance::percentage_for(&db, school.id, student.id, 2026, 8)
        .await
        .unwrap();
    assert_eq!(empty, 0.0);
}
