//! Entity prelude.

pub use super::accounts::Entity as Accounts;
pub use super::activity_snapshots::Entity as ActivitySnapshots;
pub use super::advisor_metrics::Entity as AdvisorMetrics;
pub use super::client_profitability::Entity as ClientProfitability;
pub use super::custom_field_definitions::Entity as CustomFieldDefinitions;
pub use super::custom_field_values::Entity as CustomFieldValues;
pub use super::entity_tags::Entity as EntityTags;
pub use super::firm_metrics::Entity as FirmMetrics;
pub use super::households::Entity as Households;
pub use super::outlook_items::Entity as OutlookItems;
pub use super::saved_views::Entity as SavedViews;
pub use super::tags::Entity as Tags;
pub use super::user_preferences::Entity as UserPreferences;
pub use super::users::Entity as Users;
pub use super::workflow_instances::Entity as WorkflowInstances;
pub use super::workflow_templates::Entity as WorkflowTemplates;
