//! Fee assignment and collection.
//!
//! Collection is the money-critical path: the payment insert, the
//! `paid_amount` bump and the ledger income mirror all commit together or
//! not at all. Receipts are numbered `RCP-{school_id}-{seq}` where the
//! sequence is per school.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::ledger::EntryKind;
use crate::models::prelude::*;

/// Assign a fee structure to a student, creating the student's obligation
/// row. The structure and the student must both belong to the acting
/// school.
pub async fn assign(
    db: &DbConn,
    school_id: i64,
    student_id: i64,
    fee_structure_id: i64,
    concession_amount: f64,
) -> Result<student_fee::Model> {
    if concession_amount < 0.0 {
        return Err(AppError::validation(
            "concession_amount",
            "must not be negative",
        ));
    }

    let structure = FeeStructure::find_by_id(fee_structure_id)
        .filter(fee_structure::Column::SchoolId.eq(school_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("fee_structure_id"))?;

    Student::find_by_id(student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("student_id"))?;

    if concession_amount > structure.amount {
        return Err(AppError::validation(
            "concession_amount",
            "must not exceed the fee amount",
        ));
    }

    let now = Utc::now();
    let fee = student_fee::ActiveModel {
        school_id: Set(school_id),
        student_id: Set(student_id),
        fee_structure_id: Set(fee_structure_id),
        total_amount: Set(structure.amount),
        concession_amount: Set(concession_amount),
        paid_amount: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(fee.insert(db).await?)
}

/// Receipt returned from a successful collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReceipt {
    pub payment: fee_payment::Model,
    pub due_amount: f64,
}

/// Collect a payment against a student fee.
///
/// Rejects amounts that are not strictly positive, amounts exceeding the
/// current due amount, and fee rows outside the acting school. On success
/// the payment row, the updated obligation and the ledger income entry are
/// committed atomically.
pub async fn collect(
    db: &DbConn,
    school_id: i64,
    collected_by: Option<i64>,
    student_fee_id: i64,
    amount: f64,
    note: Option<String>,
) -> Result<CollectionReceipt> {
    if amount <= 0.0 {
        return Err(AppError::validation("amount", "must be greater than zero"));
    }

    let receipt = db
        .transaction::<_, CollectionReceipt, AppError>(move |txn| {
            Box::pin(async move {
                let fee = StudentFee::find_by_id(student_fee_id)
                    .filter(student_fee::Column::SchoolId.eq(school_id))
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::not_a_valid_choice("student_fee_id"))?;

                if amount > fee.due_amount() {
                    return Err(AppError::validation(
                        "amount",
                        "amount exceeds due amount",
                    ));
                }

                let seq = FeePayment::find()
                    .filter(fee_payment::Column::SchoolId.eq(school_id))
                    .count(txn)
                    .await?
                    + 1;
                let receipt_number = format!("RCP-{}-{}", school_id, seq);

                let now = Utc::now();
                let payment = fee_payment::ActiveModel {
                    school_id: Set(school_id),
                    student_fee_id: Set(fee.id),
                    amount: Set(amount),
                    receipt_number: Set(receipt_number.clone()),
                    note: Set(note),
                    collected_by: Set(collected_by),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let paid = fee.paid_amount + amount;
                let mut model: student_fee::ActiveModel = fee.into();
                model.paid_amount = Set(paid);
                model.updated_at = Set(now);
                let fee = model.update(txn).await?;

                ledger::ActiveModel {
                    school_id: Set(school_id),
                    entry_type: Set(EntryKind::Income),
                    category: Set("fee_collection".to_string()),
                    amount: Set(amount),
                    reference: Set(Some(receipt_number)),
                    note: Set(None),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(CollectionReceipt {
                    payment,
                    due_amount: fee.due_amount(),
                })
            })
        })
        .await?;

    Ok(receipt)
}

/// Fee summary for one student: obligations with derived dues.
#[derive(Debug, Clone, Serialize)]
pub struct FeeSummaryRow {
    pub student_fee_id: i64,
    pub fee_name: String,
    pub total_amount: f64,
    pub concession_amount: f64,
    pub paid_amount: f64,
    pub due_amount: f64,
}

pub async fn summary_for_student(
    db: &DbConn,
    school_id: i64,
    student_id: i64,
) -> Result<Vec<FeeSummaryRow>> {
    let rows = StudentFee::find()
        .filter(student_fee::Column::SchoolId.eq(school_id))
        .filter(student_fee::Column::StudentId.eq(student_id))
        .find_also_related(FeeStructure)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(fee, structure)| FeeSummaryRow {
            student_fee_id: fee.id,
            fee_name: structure.map(|s| s.name).unwrap_or_default(),
            total_amount: fee.total_amount,
            concession_amount: fee.concession_amount,
            paid_amount: fee.paid_amount,
            due_amount: fee.due_amount(),
        })
        .collect())
}
