use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's fee obligation derived from a `fee_structure`.
///
/// The due amount is always derived from the three stored amounts and is
/// never persisted on its own.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub total_amount: f64,
    pub concession_amount: f64,
    pub paid_amount: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// `total - concession - paid`, recomputed on demand.
    pub fn due_amount(&self) -> f64 {
        self.total_amount - self.concession_amount - self.paid_amount
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::fee_structure::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structure::Column::Id"
    )]
    FeeStructure,
    #[sea_orm(has_many = "super::fee_payment::Entity")]
    Payments,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::fee_structure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl Related<super::fee_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
