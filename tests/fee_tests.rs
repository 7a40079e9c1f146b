//! Fee assignment and collection tests, including the atomicity of the
//! payment + balance + ledger write set.

mod common;

use chrono::Utc;
use common::{create_test_db, seed_class, seed_school, seed_session, seed_student};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use schola::models::ledger::EntryKind;
use schola::models::prelude::*;
use schola::models::{fee_structure, ledger, student_fee};
use schola::services::fees;

async fn seed_structure(
    db: &sea_orm::DatabaseConnection,
    school_id: i64,
    session_id: i64,
    class_id: i64,
    amount: f64,
) -> fee_structure::Model {
    fee_structure::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(session_id),
        class_id: Set(class_id),
        name: Set("Annual Tuition".to_string()),
        amount: Set(amount),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

struct Fixture {
    db: sea_orm::DatabaseConnection,
    school_id: i64,
    fee: student_fee::Model,
}

/// One student owing 3000 with a 500 concession, nothing paid.
async fn fixture() -> Fixture {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let session = seed_session(&db, school.id, "2026-27", true).await;
    let class = seed_class(&db, school.id, "Class 5").await;
    let student = seed_student(&db, school.id, "ADM-001").await;
    let structure = seed_structure(&db, school.id, session.id, class.id, 3000.0).await;

    let fee = fees::assign(&db, school.id, student.id, structure.id, 500.0)
        .await
        .unwrap();

    Fixture { db, school_id: school.id, fee }
}

#[tokio::test]
async fn assignment_derives_due_from_structure_and_concession() {
    let f = fixture().await;
    assert_eq!(f.fee.total_amount, 3000.0);
    assert_eq!(f.fee.concession_amount, 500.0);
    assert_eq!(f.fee.paid_amount, 0.0);
    assert_eq!(f.fee.due_amount(), 2500.0);
}

#[tokio::test]
async fn collection_updates_balance_receipt_and_ledger() {
    let f = fixture().await;

    let receipt = fees::collect(&f.db, f.school_id, None, f.fee.id, 1200.0, None)
        .await
        .unwrap();
    assert_eq!(receipt.due_amount, 1300.0);
    assert_eq!(
        receipt.payment.receipt_number,
        format!("RCP-{}-1", f.school_id)
    );

    let fee = StudentFee::find_by_id(f.fee.id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.paid_amount, 1200.0);

    // Ledger income mirror with the receipt number as reference.
    let entry = Ledger::find()
        .filter(ledger::Column::SchoolId.eq(f.school_id))
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.entry_type, EntryKind::Income);
    assert_eq!(entry.amount, 1200.0);
    assert_eq!(entry.reference.as_deref(), Some(receipt.payment.receipt_number.as_str()));
}

#[tokio::test]
async fn overpayment_is_rejected_with_no_writes() {
    let f = fixture().await;
    fees::collect(&f.db, f.school_id, None, f.fee.id, 1200.0, None)
        .await
        .unwrap();

    // Due is now 1300; 2600 exceeds it.
    let err = fees::collect(&f.db, f.school_id, None, f.fee.id, 2600.0, None).await;
    let msg = format!("{}", err.unwrap_err());
    assert!(msg.contains("amount exceeds due amount"));

    let fee = StudentFee::find_by_id(f.fee.id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.paid_amount, 1200.0);
    assert_eq!(FeePayment::find().count(&f.db).await.unwrap(), 1);
    assert_eq!(Ledger::find().count(&f.db).await.unwrap(), 1);
}

#[tokio::test]
async fn receipt_sequence_is_per_school() {
    let f = fixture().await;
    let r1 = fees::collect(&f.db, f.school_id, None, f.fee.id, 500.0, None)
        .await
        .unwrap();
    let r2 = fees::collect(&f.db, f.school_id, None, f.fee.id, 500.0, None)
        .await
        .unwrap();
    assert_eq!(r1.payment.receipt_number, format!("RCP-{}-1", f.school_id));
    assert_eq!(r2.payment.receipt_number, format!("RCP-{}-2", f.school_id));
}

#[tokio::test]
async fn cross_tenant_fee_reads_as_invalid_choice() {
    let f = fixture().await;
    let other = seed_school(&f.db, "Beta", "BT").await;

    let err = fees::collect(&f.db, other.id, None, f.fee.id, 100.0, None).await;
    let msg = format!("{}", err.unwrap_err());
    assert!(msg.contains("not a valid choice"));

    // Nothing written for either school.
    assert_eq!(FeePayment::find().count(&f.db).await.unwrap(), 0);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let f = fixture().await;
    assert!(fees::collect(&f.db, f.school_id, None, f.fee.id, 0.0, None).await.is_err());
    assert!(fees::collect(&f.db, f.school_id, None, f.fee.id, -5.0, None).await.is_err());
}

#[tokio::test]
async fn assignment_rejects_cross_tenant_structure() {
    let db = create_test_db().await;
    let school_a = seed_school(&db, "Alpha", "AL").await;
    let school_b = seed_school(&db, "Beta", "BT").await;
    let session_b = seed_session(&db, school_b.id, "2026-27", true).await;
    let class_b = seed_class(&db, school_b.id, "Class 5").await;
    let student_a = seed_student(&db, school_a.id, "ADM-001").await;
    let structure_b = seed_structure(&db, school_b.id, session_b.id, class_b.id, 1000.0).await;

    let err = fees::assign(&db, school_a.id, student_a.id, structure_b.id, 0.0).await;
    let msg = format!("{}", err.unwrap_err());
    assert!(msg.contains("not a valid choice"));
}
