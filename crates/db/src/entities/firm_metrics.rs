//! `SeaORM` Entity for firm_metrics table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "firm_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub period_type: PeriodType,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_aum: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_revenue: Decimal,
    pub total_households: i32,
    pub total_advisors: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub average_profitability_score: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub net_new_assets: Decimal,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
