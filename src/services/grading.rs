//! Marks-to-grade conversion and report-card aggregation.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;

/// Fixed pass mark. Policy constant, not per-school configurable.
pub const PASS_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

/// Pick the grade for a percentage from scales sorted by `min_percentage`
/// descending. On overlapping ranges the highest `min_percentage` that
/// contains the value wins; no containing range yields `None` (the
/// "no grade" sentinel, not an error).
pub fn pick_grade(scales: &[grade_scale::Model], percentage: f64) -> Option<&str> {
    scales
        .iter()
        .find(|s| s.min_percentage <= percentage && percentage <= s.max_percentage)
        .map(|s| s.grade_name.as_str())
}

/// Look up the grade name for a percentage in a school's scale.
pub async fn grade_for(db: &DbConn, school_id: i64, percentage: f64) -> Result<Option<String>> {
    let scales = GradeScale::find()
        .filter(grade_scale::Column::SchoolId.eq(school_id))
        .order_by_desc(grade_scale::Column::MinPercentage)
        .all(db)
        .await?;

    Ok(pick_grade(&scales, percentage).map(str::to_string))
}

/// One subject line of a report card.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectLine {
    pub subject: String,
    pub exam_type: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub percentage: f64,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCard {
    pub student_id: i64,
    pub admission_number: String,
    pub exam_type: Option<String>,
    pub subjects: Vec<SubjectLine>,
    pub total_obtained: f64,
    pub total_max: f64,
    pub overall_percentage: f64,
    pub overall_grade: Option<String>,
    pub status: ResultStatus,
}

fn percentage(obtained: f64, max: f64) -> f64 {
    if max == 0.0 {
        return 0.0;
    }
    let pct = obtained / max * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Aggregate a student's marks (optionally one exam type) into a report
/// card: per-subject grades, overall percentage and PASS/FAIL at the fixed
/// 40% threshold.
pub async fn report_card(
    db: &DbConn,
    school_id: i64,
    student_id: i64,
    exam_type: Option<String>,
) -> Result<ReportCard> {
    let student = Student::find_by_id(student_id)
        .filter(student::Column::SchoolId.eq(school_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let mut marks = StudentMark::find()
        .filter(student_mark::Column::SchoolId.eq(school_id))
        .filter(student_mark::Column::StudentId.eq(student_id));
    if let Some(exam_type) = &exam_type {
        marks = marks.filter(student_mark::Column::ExamType.eq(exam_type.clone()));
    }
    let marks = marks.all(db).await?;

    let scales = GradeScale::find()
        .filter(grade_scale::Column::SchoolId.eq(school_id))
        .order_by_desc(grade_scale::Column::MinPercentage)
        .all(db)
        .await?;

    let mut total_obtained = 0.0;
    let mut total_max = 0.0;
    let mut subjects = Vec::with_capacity(marks.len());
    for mark in marks {
        total_obtained += mark.marks_obtained;
        total_max += mark.total_marks;
        let pct = percentage(mark.marks_obtained, mark.total_marks);
        subjects.push(SubjectLine {
            subject: mark.subject,
            exam_type: mark.exam_type,
            marks_obtained: mark.marks_obtained,
            total_marks: mark.total_marks,
            percentage: pct,
            grade: pick_grade(&scales, pct).map(str::to_string),
        });
    }

    let overall_percentage = percentage(total_obtained, total_max);
    let overall_grade = pick_grade(&scales, overall_percentage).map(str::to_string);
    let status = if overall_percentage >= PASS_THRESHOLD {
        ResultStatus::Pass
    } else {
        ResultStatus::Fail
    };

    Ok(ReportCard {
        student_id: student.id,
        admission_number: student.admission_number,
        exam_type,
        subjects,
        total_obtained,
        total_max,
        overall_percentage,
        overall_grade,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scale(id: i64, grade: &str, min: f64, max: f64) -> grade_scale::Model {
        grade_scale::Model {
            id,
            school_id: 1,
            grade_name: grade.to_string(),
            min_percentage: min,
            max_percentage: max,
            created_at: Utc::now(),
        }
    }

    fn sorted_desc(mut scales: Vec<grade_scale::Model>) -> Vec<grade_scale::Model> {
        scales.sort_by(|a, b| b.min_percentage.partial_cmp(&a.min_percentage).unwrap());
        scales
    }

    #[test]
    fn containment_lookup() {
        let scales = sorted_desc(vec![
            scale(1, "A", 80.0, 100.0),
            scale(2, "B", 60.0, 79.99),
            scale(3, "C", 40.0, 59.99),
        ]);
        assert_eq!(pick_grade(&scales, 85.0), Some("A"));
        assert_eq!(pick_grade(&scales, 60.0), Some("B"));
        assert_eq!(pick_grade(&scales, 40.0), Some("C"));
    }

    #[test]
    fn overlapping_ranges_highest_min_wins() {
        let scales = sorted_desc(vec![
            scale(1, "B", 50.0, 100.0),
            scale(2, "A", 75.0, 100.0),
        ]);
        assert_eq!(pick_grade(&scales, 80.0), Some("A"));
        assert_eq!(pick_grade(&scales, 60.0), Some("B"));
    }

    #[test]
    fn no_containing_range_is_the_sentinel() {
        let scales = sorted_desc(vec![scale(1, "A", 80.0, 100.0)]);
        assert_eq!(pick_grade(&scales, 10.0), None);
        assert_eq!(pick_grade(&[], 50.0), None);
    }

    #[test]
    fn percentage_zero_when_no_marks() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
    }
}
