//! `SeaORM` Entity for advisor_metrics table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "advisor_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub advisor_id: Uuid,
    pub period_type: PeriodType,
    pub period_start: Date,
    pub period_end: Date,
    pub households: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_aum: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub new_aum: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub revenue: Decimal,
    pub meetings_held: i32,
    pub tasks_completed: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub client_retention_rate: Decimal,
    #[sea_orm(column_type = "JsonBinary")]
    pub goals: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AdvisorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
