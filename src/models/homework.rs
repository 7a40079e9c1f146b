use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment scoped to (school, session, class, section, subject).
/// `is_published` gates visibility to parents.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "homework")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub session_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id"
    )]
    Class,
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
