use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only action record. Never updated or deleted by application logic.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: DateTimeUtc,
    pub school_id: Option<i64>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<String>, // JSON string for flexible data
    pub method: Option<String>,
    pub path: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Audit action types
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AuditAction {
    Login,
    LoginFailed,
    SchoolCreated,
    SchoolUpdated,
    UserCreated,
    UserUpdated,
    SessionCreated,
    SessionUpdated,
    SessionDeleted,
    SessionActivated,
    ClassCreated,
    SectionCreated,
    StudentCreated,
    StudentUpdated,
    EnrollmentStatusChanged,
    AttendanceMarked,
    MarksRecorded,
    GradeScaleCreated,
    GradeScaleDeleted,
    HomeworkCreated,
    HomeworkUpdated,
    HomeworkDeleted,
    HomeworkPublishToggled,
    FeeStructureCreated,
    FeeAssigned,
    FeeCollected,
    NoticeCreated,
    NoticePublishToggled,
    NoticeRead,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Login => write!(f, "login"),
            AuditAction::LoginFailed => write!(f, "login_failed"),
            AuditAction::SchoolCreated => write!(f, "school_created"),
            AuditAction::SchoolUpdated => write!(f, "school_updated"),
            AuditAction::UserCreated => write!(f, "user_created"),
            AuditAction::UserUpdated => write!(f, "user_updated"),
            AuditAction::SessionCreated => write!(f, "session_created"),
            AuditAction::SessionUpdated => write!(f, "session_updated"),
            AuditAction::SessionDeleted => write!(f, "session_deleted"),
            AuditAction::SessionActivated => write!(f, "session_activated"),
            AuditAction::ClassCreated => write!(f, "class_created"),
            AuditAction::SectionCreated => write!(f, "section_created"),
            AuditAction::StudentCreated => write!(f, "student_created"),
            AuditAction::StudentUpdated => write!(f, "student_updated"),
            AuditAction::EnrollmentStatusChanged => write!(f, "enrollment_status_changed"),
            AuditAction::AttendanceMarked => write!(f, "attendance_marked"),
            AuditAction::MarksRecorded => write!(f, "marks_recorded"),
            AuditAction::GradeScaleCreated => write!(f, "grade_scale_created"),
            AuditAction::GradeScaleDeleted => write!(f, "grade_scale_deleted"),
            AuditAction::HomeworkCreated => write!(f, "homework_created"),
            AuditAction::HomeworkUpdated => write!(f, "homework_updated"),
            AuditAction::HomeworkDeleted => write!(f, "homework_deleted"),
            AuditAction::HomeworkPublishToggled => write!(f, "homework_publish_toggled"),
            AuditAction::FeeStructureCreated => write!(f, "fee_structure_created"),
            AuditAction::FeeAssigned => write!(f, "fee_assigned"),
            AuditAction::FeeCollected => write!(f, "fee_collected"),
            AuditAction::NoticeCreated => write!(f, "notice_created"),
            AuditAction::NoticePublishToggled => write!(f, "notice_publish_toggled"),
            AuditAction::NoticeRead => write!(f, "notice_read"),
        }
    }
}

// Resource types
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ResourceType {
    School,
    User,
    Session,
    Class,
    Section,
    Student,
    Enrollment,
    Attendance,
    Mark,
    GradeScale,
    Homework,
    FeeStructure,
    StudentFee,
    FeePayment,
    Notice,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::School => write!(f, "school"),
            ResourceType::User => write!(f, "user"),
            ResourceType::Session => write!(f, "session"),
            ResourceType::Class => write!(f, "class"),
            ResourceType::Section => write!(f, "section"),
            ResourceType::Student => write!(f, "student"),
            ResourceType::Enrollment => write!(f, "enrollment"),
            ResourceType::Attendance => write!(f, "attendance"),
            ResourceType::Mark => write!(f, "mark"),
            ResourceType::GradeScale => write!(f, "grade_scale"),
            ResourceType::Homework => write!(f, "homework"),
            ResourceType::FeeStructure => write!(f, "fee_structure"),
            ResourceType::StudentFee => write!(f, "student_fee"),
            ResourceType::FeePayment => write!(f, "fee_payment"),
            ResourceType::Notice => write!(f, "notice"),
        }
    }
}
