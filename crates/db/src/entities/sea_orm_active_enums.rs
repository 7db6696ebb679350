//! Postgres enum types and their mapping to domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use hearth_core::auth::UserRole as CoreUserRole;
use hearth_core::customization::FieldType;
use hearth_core::period::PeriodType as CorePeriodType;
use hearth_core::profitability::ProfitabilityTier as CoreTier;
use hearth_core::workflow::WorkflowStatus as CoreWorkflowStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "advisor")]
    Advisor,
    #[sea_orm(string_value = "operations")]
    Operations,
    #[sea_orm(string_value = "compliance")]
    Compliance,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl From<UserRole> for CoreUserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Advisor => Self::Advisor,
            UserRole::Operations => Self::Operations,
            UserRole::Compliance => Self::Compliance,
            UserRole::Viewer => Self::Viewer,
        }
    }
}

impl From<CoreUserRole> for UserRole {
    fn from(role: CoreUserRole) -> Self {
        match role {
            CoreUserRole::Admin => Self::Admin,
            CoreUserRole::Advisor => Self::Advisor,
            CoreUserRole::Operations => Self::Operations,
            CoreUserRole::Compliance => Self::Compliance,
            CoreUserRole::Viewer => Self::Viewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_type")]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "annual")]
    Annual,
}

impl From<PeriodType> for CorePeriodType {
    fn from(p: PeriodType) -> Self {
        match p {
            PeriodType::Monthly => Self::Monthly,
            PeriodType::Quarterly => Self::Quarterly,
            PeriodType::Annual => Self::Annual,
        }
    }
}

impl From<CorePeriodType> for PeriodType {
    fn from(p: CorePeriodType) -> Self {
        match p {
            CorePeriodType::Monthly => Self::Monthly,
            CorePeriodType::Quarterly => Self::Quarterly,
            CorePeriodType::Annual => Self::Annual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "profitability_tier")]
#[serde(rename_all = "lowercase")]
pub enum ProfitabilityTier {
    #[sea_orm(string_value = "bronze")]
    Bronze,
    #[sea_orm(string_value = "silver")]
    Silver,
    #[sea_orm(string_value = "gold")]
    Gold,
    #[sea_orm(string_value = "platinum")]
    Platinum,
}

impl From<ProfitabilityTier> for CoreTier {
    fn from(t: ProfitabilityTier) -> Self {
        match t {
            ProfitabilityTier::Bronze => Self::Bronze,
            ProfitabilityTier::Silver => Self::Silver,
            ProfitabilityTier::Gold => Self::Gold,
            ProfitabilityTier::Platinum => Self::Platinum,
        }
    }
}

impl From<CoreTier> for ProfitabilityTier {
    fn from(t: CoreTier) -> Self {
        match t {
            CoreTier::Bronze => Self::Bronze,
            CoreTier::Silver => Self::Silver,
            CoreTier::Gold => Self::Gold,
            CoreTier::Platinum => Self::Platinum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "custom_field_type")]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "textarea")]
    Textarea,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "url")]
    Url,
    #[sea_orm(string_value = "phone")]
    Phone,
    #[sea_orm(string_value = "number")]
    Number,
    #[sea_orm(string_value = "currency")]
    Currency,
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "date")]
    Date,
    #[sea_orm(string_value = "datetime")]
    Datetime,
    #[sea_orm(string_value = "boolean")]
    Boolean,
    #[sea_orm(string_value = "select")]
    Select,
    #[sea_orm(string_value = "multi_select")]
    MultiSelect,
    #[sea_orm(string_value = "json")]
    Json,
}

impl From<CustomFieldType> for FieldType {
    fn from(t: CustomFieldType) -> Self {
        match t {
            CustomFieldType::Text => Self::Text,
            CustomFieldType::Textarea => Self::Textarea,
            CustomFieldType::Email => Self::Email,
            CustomFieldType::Url => Self::Url,
            CustomFieldType::Phone => Self::Phone,
            CustomFieldType::Number => Self::Number,
            CustomFieldType::Currency => Self::Currency,
            CustomFieldType::Percentage => Self::Percentage,
            CustomFieldType::Date => Self::Date,
            CustomFieldType::Datetime => Self::Datetime,
            CustomFieldType::Boolean => Self::Boolean,
            CustomFieldType::Select => Self::Select,
            CustomFieldType::MultiSelect => Self::MultiSelect,
            CustomFieldType::Json => Self::Json,
        }
    }
}

impl From<FieldType> for CustomFieldType {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Text => Self::Text,
            FieldType::Textarea => Self::Textarea,
            FieldType::Email => Self::Email,
            FieldType::Url => Self::Url,
            FieldType::Phone => Self::Phone,
            FieldType::Number => Self::Number,
            FieldType::Currency => Self::Currency,
            FieldType::Percentage => Self::Percentage,
            FieldType::Date => Self::Date,
            FieldType::Datetime => Self::Datetime,
            FieldType::Boolean => Self::Boolean,
            FieldType::Select => Self::Select,
            FieldType::MultiSelect => Self::MultiSelect,
            FieldType::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "workflow_status")]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<WorkflowStatus> for CoreWorkflowStatus {
    fn from(s: WorkflowStatus) -> Self {
        match s {
            WorkflowStatus::Active => Self::Active,
            WorkflowStatus::Completed => Self::Completed,
            WorkflowStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreWorkflowStatus> for WorkflowStatus {
    fn from(s: CoreWorkflowStatus) -> Self {
        match s {
            CoreWorkflowStatus::Active => Self::Active,
            CoreWorkflowStatus::Completed => Self::Completed,
            CoreWorkflowStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "outlook_item_kind")]
#[serde(rename_all = "lowercase")]
pub enum OutlookItemKind {
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "event")]
    Event,
}

impl OutlookItemKind {
    /// Parses `email` or `event`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email" => Some(Self::Email),
            "event" => Some(Self::Event),
            _ => None,
        }
    }
}
