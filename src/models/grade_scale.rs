use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-school percentage band mapped to a grade name.
///
/// Ranges are not validated for gaps or overlaps; on overlap the lookup in
/// `services::grading` picks the row with the highest `min_percentage`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade_scales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub grade_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub created_at: DateTimeUtc,
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
