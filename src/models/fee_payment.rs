use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Immutable receipt of a single payment against a `student_fee`.
/// Rows are only ever inserted, never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_fee_id: i64,
    pub amount: f64,
    /// `RCP-{school_id}-{sequence}`, unique per school.
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub note: Option<String>,
    pub collected_by: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_fee::Entity",
        from = "Column::StudentFeeId",
        to = "super::student_fee::Column::Id"
    )]
    StudentFee,
}

impl Related<super::student_fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
