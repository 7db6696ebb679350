//! Saved view configuration and preference keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::error::ViewError;

/// Maximum preference key length.
pub const MAX_PREFERENCE_KEY_LEN: usize = 100;

/// Largest page size a view may request.
pub const MAX_VIEW_PAGE_SIZE: u32 = 200;

/// Sort direction of a saved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Sort clause of a saved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSort {
    /// Column to sort by.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Structured form of a saved view's JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Visible columns, in order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Filter expression, passed through to the client untouched.
    #[serde(default = "empty_object")]
    pub filters: Value,
    /// Optional sort.
    #[serde(default)]
    pub sort: Option<ViewSort>,
    /// Optional page size.
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ViewConfig {
    /// Parses and checks a raw config.
    pub fn from_json(raw: &Value) -> Result<Self, ViewError> {
        if !raw.is_object() {
            return Err(ViewError::InvalidConfig("config must be an object".to_string()));
        }
        let config: Self = serde_json::from_value(raw.clone())
            .map_err(|e| ViewError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ViewError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.trim().is_empty() {
                return Err(ViewError::InvalidConfig("column names cannot be blank".to_string()));
            }
            if !seen.insert(column.as_str()) {
                return Err(ViewError::InvalidConfig(format!("duplicate column '{column}'")));
            }
        }

        if !(self.filters.is_object() || self.filters.is_array()) {
            return Err(ViewError::InvalidConfig(
                "filters must be an object or array".to_string(),
            ));
        }

        if let Some(sort) = &self.sort
            && sort.field.trim().is_empty()
        {
            return Err(ViewError::InvalidConfig("sort field cannot be blank".to_string()));
        }

        if let Some(size) = self.page_size
            && !(1..=MAX_VIEW_PAGE_SIZE).contains(&size)
        {
            return Err(ViewError::InvalidConfig(format!(
                "page_size must be between 1 and {MAX_VIEW_PAGE_SIZE}"
            )));
        }

        Ok(())
    }

    /// Serializes back to the stored JSON form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| empty_object())
    }
}

/// Trims and checks a view name.
pub fn validate_view_name(name: &str) -> Result<String, ViewError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ViewError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Preference keys are dotted identifiers such as `dashboard.layout`.
pub fn validate_preference_key(key: &str) -> Result<(), ViewError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_PREFERENCE_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ViewError::InvalidPreferenceKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_full_config_parses() {
        let config = ViewConfig::from_json(&json!({
            "columns": ["name", "total_aum", "tier"],
            "filters": { "tier": ["platinum", "gold"] },
            "sort": { "field": "total_aum", "direction": "desc" },
            "page_size": 50
        }))
        .unwrap();

        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.sort.as_ref().unwrap().direction, SortDirection::Desc);
        assert_eq!(config.page_size, Some(50));
    }

    #[test]
    fn test_empty_config_gets_defaults() {
        let config = ViewConfig::from_json(&json!({})).unwrap();
        assert!(config.columns.is_empty());
        assert_eq!(config.filters, json!({}));
        assert_eq!(config.to_json()["filters"], json!({}));
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!({ "columns": ["name", "name"] }))]
    #[case(json!({ "columns": [""] }))]
    #[case(json!({ "filters": "tier = gold" }))]
    #[case(json!({ "sort": { "field": "name", "direction": "sideways" } }))]
    #[case(json!({ "page_size": 0 }))]
    #[case(json!({ "page_size": 500 }))]
    #[case(json!({ "colour": "blue" }))]
    fn test_invalid_configs(#[case] raw: Value) {
        assert!(matches!(
            ViewConfig::from_json(&raw),
            Err(ViewError::InvalidConfig(_))
        ));
    }

    #[rstest]
    #[case("dashboard.layout", true)]
    #[case("theme", true)]
    #[case("table-density_v2", true)]
    #[case("", false)]
    #[case("has space", false)]
    #[case("slash/key", false)]
    fn test_preference_keys(#[case] key: &str, #[case] ok: bool) {
        assert_eq!(validate_preference_key(key).is_ok(), ok);
    }

    #[test]
    fn test_view_name() {
        assert_eq!(validate_view_name(" My book ").unwrap(), "My book");
        assert_eq!(validate_view_name(""), Err(ViewError::EmptyName));
    }
}
