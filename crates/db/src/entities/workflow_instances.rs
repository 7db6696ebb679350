//! `SeaORM` Entity for workflow_instances table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::WorkflowStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub status: WorkflowStatus,
    pub current_step: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub step_completions: Json,
    pub started_by: Option<Uuid>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub cancelled_by: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cancel_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workflow_templates::Entity",
        from = "Column::TemplateId",
        to = "super::workflow_templates::Column::Id"
    )]
    WorkflowTemplates,
}

impl Related<super::workflow_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
