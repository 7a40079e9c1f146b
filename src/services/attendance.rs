//! Per-day attendance capture and reporting.
//!
//! Marking is a batch upsert keyed on (school, session, student, date):
//! re-marking a day overwrites the status in place. The whole batch is
//! validated before any row is written and the writes run in one
//! transaction, so a bad entry rejects the submission with no partial
//! state.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::student_attendance::AttendanceStatus;

/// One (student, status) pair in a marking batch.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

/// Mark attendance for a class on one date. Returns the number of rows
/// upserted.
#[allow(clippy::too_many_arguments)]
pub async fn mark(
    db: &DbConn,
    school_id: i64,
    session_id: i64,
    class_id: i64,
    section_id: Option<i64>,
    date: NaiveDate,
    entries: Vec<AttendanceEntry>,
    marked_by: Option<i64>,
) -> Result<usize> {
    if entries.is_empty() {
        return Err(AppError::validation("entries", "must not be empty"));
    }

    // Every referenced student must exist in the acting school before any
    // row is written.
    let student_ids: HashSet<i64> = entries.iter().map(|e| e.student_id).collect();
    let known = Student::find()
        .filter(student::Column::Id.is_in(student_ids.iter().copied().collect::<Vec<_>>()))
        .filter(student::Column::SchoolId.eq(school_id))
        .count(db)
        .await?;
    if known as usize != student_ids.len() {
        return Err(AppError::not_a_valid_choice("student_id"));
    }

    let written = db
        .transaction::<_, usize, AppError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let mut written = 0usize;
                for entry in entries {
                    let row = student_attendance::ActiveModel {
                        school_id: Set(school_id),
                        session_id: Set(session_id),
                        class_id: Set(class_id),
                        section_id: Set(section_id),
                        student_id: Set(entry.student_id),
                        date: Set(date),
                        status: Set(entry.status),
                        marked_by: Set(marked_by),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };

                    StudentAttendance::insert(row)
                        .on_conflict(
                            OnConflict::columns([
                                student_attendance::Column::SchoolId,
                                student_attendance::Column::SessionId,
                                student_attendance::Column::StudentId,
                                student_attendance::Column::Date,
                            ])
                            .update_columns([
                                student_attendance::Column::ClassId,
                                student_attendance::Column::SectionId,
                                student_attendance::Column::Status,
                                student_attendance::Column::MarkedBy,
                                student_attendance::Column::UpdatedAt,
                            ])
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    written += 1;
                }
                Ok(written)
            })
        })
        .await?;

    Ok(written)
}

/// Per-student line of a monthly attendance report.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReportRow {
    pub student_id: i64,
    pub admission_number: String,
    pub name: String,
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub total: u32,
    pub percentage: f64,
}

/// Month bounds as [first day, first day of next month).
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation("month", "not a valid month"))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::validation("month", "not a valid month"))?;
    Ok((start, end))
}

/// Attendance percentage rounded to two decimals; 0 when nothing was marked.
pub fn attendance_percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = f64::from(present) / f64::from(total) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Monthly attendance report for a class (optionally one section).
#[allow(clippy::too_many_arguments)]
pub async fn monthly_report(
    db: &DbConn,
    school_id: i64,
    session_id: i64,
    class_id: i64,
    section_id: Option<i64>,
    year: i32,
    month: u32,
) -> Result<Vec<MonthlyReportRow>> {
    let (start, end) = month_bounds(year, month)?;

    let mut students = Student::find()
        .filter(student::Column::SchoolId.eq(school_id))
        .filter(student::Column::CurrentClassId.eq(class_id));
    if let Some(section_id) = section_id {
        students = students.filter(student::Column::CurrentSectionId.eq(section_id));
    }
    let students = students.all(db).await?;

    let rows = StudentAttendance::find()
        .filter(student_attendance::Column::SchoolId.eq(school_id))
        .filter(student_attendance::Column::SessionId.eq(session_id))
        .filter(student_attendance::Column::ClassId.eq(class_id))
        .filter(student_attendance::Column::Date.gte(start))
        .filter(student_attendance::Column::Date.lt(end))
        .all(db)
        .await?;

    let mut counts: HashMap<i64, (u32, u32, u32)> = HashMap::new();
    for row in rows {
        let entry = counts.entry(row.student_id).or_default();
        match row.status {
            AttendanceStatus::Present => entry.0 += 1,
            AttendanceStatus::Absent => entry.1 += 1,
            AttendanceStatus::Leave => entry.2 += 1,
        }
    }

    let mut report = Vec::with_capacity(students.len());
    for s in students {
        let (present, absent, leave) = counts.get(&s.id).copied().unwrap_or_default();
        let total = present + absent + leave;
        let name = match &s.last_name {
            Some(last) => format!("{} {}", s.first_name, last),
            None => s.first_name.clone(),
        };
        report.push(MonthlyReportRow {
            student_id: s.id,
            admission_number: s.admission_number,
            name,
            present,
            absent,
            leave,
            total,
            percentage: attendance_percentage(present, total),
        });
    }

    Ok(report)
}

/// Attendance percentage for one student in one month.
pub async fn percentage_for(
    db: &DbConn,
    school_id: i64,
    student_id: i64,
    year: i32,
    month: u32,
) -> Result<f64> {
    let (start, end) = month_bounds(year, month)?;

    let rows = StudentAttendance::find()
        .filter(student_attendance::Column::SchoolId.eq(school_id))
        .filter(student_attendance::Column::StudentId.eq(student_id))
        .filter(student_attendance::Column::Date.gte(start))
        .filter(student_attendance::Column::Date.lt(end))
        .all(db)
        .await?;

    let total = rows.len() as u32;
    let present = rows
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count() as u32;

    Ok(attendance_percentage(present, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_zero_when_nothing_marked() {
        assert_eq!(attendance_percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        // 1/3 -> 33.333... -> 33.33
        assert_eq!(attendance_percentage(1, 3), 33.33);
        // 2/3 -> 66.666... -> 66.67
        assert_eq!(attendance_percentage(2, 3), 66.67);
        assert_eq!(attendance_percentage(3, 3), 100.0);
    }

    #[test]
    fn month_bounds_handle_december() {
        let (start, end) = month_bounds(2026, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn month_bounds_reject_invalid_month() {
        assert!(month_bounds(2026, 13).is_err());
    }
}
