pub use sea_orm_migration::prelude::*;

mod m20260815_000001_create_schools;
mod m20260815_000002_create_users;
mod m20260815_000003_create_academic_sessions;
mod m20260815_000004_create_classes_sections;
mod m20260815_000005_create_students;
mod m20260815_000006_create_student_enrollments;
mod m20260815_000007_create_marks_grade_scales;
mod m20260815_000008_create_student_attendance;
mod m20260815_000009_create_homework;
mod m20260815_000010_create_fees;
mod m20260815_000011_create_notices;
mod m20260815_000012_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_schools::Migration),
            Box::new(m20260815_000002_create_users::Migration),
            Box::new(m20260815_000003_create_academic_sessions::Migration),
            Box::new(m20260815_000004_create_classes_sections::Migration),
            Box::new(m20260815_000005_create_students::Migration),
            Box::new(m20260815_000006_create_student_enrollments::Migration),
            Box::new(m20260815_000007_create_marks_grade_scales::Migration),
            Box::new(m20260815_000008_create_student_attendance::Migration),
            Box::new(m20260815_000009_create_homework::Migration),
            Box::new(m20260815_000010_create_fees::Migration),
            Box::new(m20260815_000011_create_notices::Migration),
            Box::new(m20260815_000012_create_audit_logs::Migration),
        ]
    }
}
