use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Who a notice is aimed at: everyone in the school, or one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Audience {
    #[sea_orm(string_value = "all")]
    #[serde(rename = "all")]
    All,
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

impl Audience {
    /// Whether a user with `role` is in this audience.
    pub fn includes(&self, role: super::user::Role) -> bool {
        use super::user::Role;
        match self {
            Audience::All => true,
            Audience::Schooladmin => role == Role::Schooladmin,
            Audience::Teacher => role == Role::Teacher,
            Audience::Accountant => role == Role::Accountant,
            Audience::Staff => role == Role::Staff,
            Audience::Parent => role == Role::Parent,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub body: String,
    pub target_role: Audience,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notice_read::Entity")]
    Reads,
}

impl Related<super::notice_read::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
