//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod activity_snapshots;
pub mod advisor_metrics;
pub mod client_profitability;
pub mod custom_field_definitions;
pub mod custom_field_values;
pub mod entity_tags;
pub mod firm_metrics;
pub mod households;
pub mod outlook_items;
pub mod saved_views;
pub mod sea_orm_active_enums;
pub mod tags;
pub mod user_preferences;
pub mod users;
pub mod workflow_instances;
pub mod workflow_templates;
