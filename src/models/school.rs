use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant root. Every other tenant-scoped entity hangs off a school.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// The single active academic session, maintained by session activation.
    pub current_session_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::academic_session::Entity")]
    AcademicSessions,
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::academic_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicSessions.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
