//! `SeaORM` Entity for workflow_templates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub entity_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: Json,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workflow_instances::Entity")]
    WorkflowInstances,
}

impl Related<super::workflow_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowInstances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
