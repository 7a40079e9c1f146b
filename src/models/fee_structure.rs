use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee amount applicable to a (school, session, class) combination.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub session_id: i64,
    pub class_id: i64,
    pub name: String,
    pub amount: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_fee::Entity")]
    StudentFees,
}

impl Related<super::student_fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
