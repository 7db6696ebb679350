//! `SeaORM` Entity for households table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "households")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub advisor_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_aum: Decimal,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AdvisorId",
        to = "super::users::Column::Id"
    )]
    Advisor,
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::client_profitability::Entity")]
    ClientProfitability,
    #[sea_orm(has_many = "super::outlook_items::Entity")]
    OutlookItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advisor.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::client_profitability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientProfitability.def()
    }
}

impl Related<super::outlook_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutlookItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
