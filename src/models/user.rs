use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed role set. Every protected operation declares an allow-list of
/// these; `Superadmin` is the only role not bound to a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "superadmin")]
    #[serde(rename = "superadmin")]
    Superadmin,
    #[sea_orm(string_value = "schooladmin")]
    #[serde(rename = "schooladmin")]
    Schooladmin,
    #[sea_orm(string_value = "teacher")]
    #[serde(rename = "teacher")]
    Teacher,
    #[sea_orm(string_value = "accountant")]
    #[serde(rename = "accountant")]
    Accountant,
    #[sea_orm(string_value = "staff")]
    #[serde(rename = "staff")]
    Staff,
    #[sea_orm(string_value = "parent")]
    #[serde(rename = "parent")]
    Parent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Superadmin => write!(f, "superadmin"),
            Role::Schooladmin => write!(f, "schooladmin"),
            Role::Teacher => write!(f, "teacher"),
            Role::Accountant => write!(f, "accountant"),
            Role::Staff => write!(f, "staff"),
            Role::Parent => write!(f, "parent"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// None only for superadmin accounts.
    pub school_id: Option<i64>,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub role: Role,
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
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
