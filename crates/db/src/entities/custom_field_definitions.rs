//! `SeaORM` Entity for custom_field_definitions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CustomFieldType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_field_definitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_type: String,
    pub field_key: String,
    pub label: String,
    pub field_type: CustomFieldType,
    pub is_required: bool,
    pub is_active: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub options: Json,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub default_value: Option<Json>,
    pub sort_order: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub help_text: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::custom_field_values::Entity")]
    CustomFieldValues,
}

impl Related<super::custom_field_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomFieldValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
