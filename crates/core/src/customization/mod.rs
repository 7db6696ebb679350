//! User customization: custom fields, tags, saved views and preferences.
//!
//! This module provides:
//! - The typed write path for EAV custom field values
//! - Field definition and field key validation
//! - Tag naming rules, hierarchy cycle checks and tree assembly
//! - Saved view config and preference key validation

pub mod error;
pub mod field_value;
pub mod tags;
pub mod types;
pub mod views;

#[cfg(test)]
mod field_value_tests;

pub use error::{CustomFieldError, TagError, ViewError};
pub use field_value::{validate_definition, validate_field_key, validate_field_value};
pub use tags::{
    TagNode, TagTreeNode, build_tag_tree, ensure_no_cycle, normalize_color, validate_tag_name,
};
pub use types::{EntityType, FieldDefinitionSpec, FieldType, TypedFieldValue, ValueColumns};
pub use views::{SortDirection, ViewConfig, ViewSort, validate_preference_key, validate_view_name};
