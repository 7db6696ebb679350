//! `SeaORM` Entity for client_profitability table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PeriodType, ProfitabilityTier};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "client_profitability")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub household_id: Uuid,
    pub period_type: PeriodType,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub aum: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub management_fee_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub planning_fee_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub other_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub advisor_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub operations_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub compliance_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub technology_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub custodian_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub marketing_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub overhead_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub direct_labor_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub gross_profit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub net_profit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub gross_margin: Decimal,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub net_margin: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub revenue_per_hour: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub profit_per_hour: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 6)))")]
    pub effective_fee_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub profitability_score: Decimal,
    pub tier: ProfitabilityTier,
    pub calculated_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id",
        on_delete = "Cascade"
    )]
    Households,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Households.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
