use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permanent student identity. The current (session, class, section) triple
/// is denormalized here; the per-session history lives in
/// `student_enrollment`, kept in sync by `services::enrollment`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    #[sea_orm(unique)]
    pub admission_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub guardian_name: Option<String>,
    pub current_session_id: Option<i64>,
    pub current_class_id: Option<i64>,
    pub current_section_id: Option<i64>,
    /// Must reference a user with role `parent` of the same school.
    pub parent_user_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::student_enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::student_fee::Entity")]
    Fees,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::student_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::student_fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
