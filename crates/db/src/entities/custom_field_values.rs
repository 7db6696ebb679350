//! `SeaORM` Entity for custom_field_values table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_field_values")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub field_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub value_text: Option<String>,
    pub value_number: Option<Decimal>,
    pub value_boolean: Option<bool>,
    pub value_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub value_json: Option<Json>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_field_definitions::Entity",
        from = "Column::FieldId",
        to = "super::custom_field_definitions::Column::Id",
        on_delete = "Cascade"
    )]
    CustomFieldDefinitions,
}

impl Related<super::custom_field_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomFieldDefinitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
