//! Typing and validation of custom field values.
//!
//! A raw JSON value coming from a client is checked against the field's
//! declared type and turned into a [`TypedFieldValue`] that names exactly
//! one storage column. `Ok(None)` means "clear the stored value".

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;

use super::error::CustomFieldError;
use super::types::{FieldDefinitionSpec, FieldType, TypedFieldValue};

/// Maximum field key length.
pub const MAX_FIELD_KEY_LEN: usize = 64;

/// Validates a field key: lowercase snake case starting with a letter.
pub fn validate_field_key(key: &str) -> Result<(), CustomFieldError> {
    let mut chars = key.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if starts_with_letter && rest_ok && key.len() <= MAX_FIELD_KEY_LEN {
        Ok(())
    } else {
        Err(CustomFieldError::InvalidFieldKey(key.to_string()))
    }
}

/// Validates a field definition before it is stored.
///
/// Choice types need a non-empty list of distinct, non-blank options, and a
/// declared range must have `min <= max`.
pub fn validate_definition(spec: &FieldDefinitionSpec) -> Result<(), CustomFieldError> {
    validate_field_key(&spec.field_key)?;

    if spec.field_type.is_choice() {
        if spec.options.is_empty() {
            return Err(CustomFieldError::MissingOptions(spec.field_type.as_str()));
        }
        let mut seen = HashSet::new();
        for option in &spec.options {
            if option.trim().is_empty() {
                return Err(CustomFieldError::InvalidOptions(
                    "options cannot be blank".to_string(),
                ));
            }
            if !seen.insert(option.as_str()) {
                return Err(CustomFieldError::InvalidOptions(format!(
                    "duplicate option '{option}'"
                )));
            }
        }
    }

    if let (Some(min), Some(max)) = (spec.min_value, spec.max_value)
        && min > max
    {
        return Err(CustomFieldError::InvalidRange { min, max });
    }

    Ok(())
}

/// Types a raw value against its field definition.
///
/// `raw` of `None` or JSON `null` clears an optional field and is rejected
/// for a required one.
pub fn validate_field_value(
    spec: &FieldDefinitionSpec,
    raw: Option<&Value>,
) -> Result<Option<TypedFieldValue>, CustomFieldError> {
    let key = spec.field_key.as_str();

    let value = match raw {
        None | Some(Value::Null) => {
            return if spec.is_required {
                Err(CustomFieldError::Required(key.to_string()))
            } else {
                Ok(None)
            };
        }
        Some(v) => v,
    };

    let typed = match spec.field_type {
        FieldType::Number | FieldType::Currency | FieldType::Percentage => {
            TypedFieldValue::Number(number_value(spec, value)?)
        }
        FieldType::Date | FieldType::Datetime => TypedFieldValue::Date(date_value(key, value)?),
        FieldType::Select => {
            let choice = value
                .as_str()
                .ok_or_else(|| CustomFieldError::ExpectedString(key.to_string()))?;
            ensure_option(spec, choice)?;
            TypedFieldValue::Text(choice.to_string())
        }
        FieldType::MultiSelect => {
            let items = value
                .as_array()
                .ok_or_else(|| CustomFieldError::ExpectedArray(key.to_string()))?;
            for item in items {
                let choice = item
                    .as_str()
                    .ok_or_else(|| CustomFieldError::ExpectedArray(key.to_string()))?;
                ensure_option(spec, choice)?;
            }
            TypedFieldValue::Json(value.clone())
        }
        FieldType::Text | FieldType::Textarea | FieldType::Phone => {
            TypedFieldValue::Text(string_value(key, value)?.to_string())
        }
        FieldType::Email => {
            let s = string_value(key, value)?;
            if !s.contains('@') {
                return Err(CustomFieldError::InvalidEmail(key.to_string()));
            }
            TypedFieldValue::Text(s.to_string())
        }
        FieldType::Url => {
            let s = string_value(key, value)?;
            if !(s.starts_with("http://") || s.starts_with("https://")) {
                return Err(CustomFieldError::InvalidUrl(key.to_string()));
            }
            TypedFieldValue::Text(s.to_string())
        }
        FieldType::Boolean => TypedFieldValue::Boolean(bool_value(key, value)?),
        FieldType::Json => TypedFieldValue::Json(value.clone()),
    };

    Ok(Some(typed))
}

fn string_value<'a>(key: &str, value: &'a Value) -> Result<&'a str, CustomFieldError> {
    value
        .as_str()
        .ok_or_else(|| CustomFieldError::ExpectedString(key.to_string()))
}

fn number_value(spec: &FieldDefinitionSpec, value: &Value) -> Result<Decimal, CustomFieldError> {
    let key = spec.field_key.as_str();
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(CustomFieldError::InvalidNumber(key.to_string())),
    };

    let number = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| CustomFieldError::InvalidNumber(key.to_string()))?;

    let below = spec.min_value.is_some_and(|min| number < min);
    let above = spec.max_value.is_some_and(|max| number > max);
    if below || above {
        return Err(CustomFieldError::OutOfRange {
            field: key.to_string(),
            value: number,
        });
    }

    Ok(number)
}

fn date_value(key: &str, value: &Value) -> Result<DateTime<Utc>, CustomFieldError> {
    let s = value
        .as_str()
        .ok_or_else(|| CustomFieldError::InvalidDate(key.to_string()))?;

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CustomFieldError::InvalidDate(key.to_string()))
}

fn bool_value(key: &str, value: &Value) -> Result<bool, CustomFieldError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(CustomFieldError::InvalidBoolean(key.to_string())),
    }
}

fn ensure_option(spec: &FieldDefinitionSpec, choice: &str) -> Result<(), CustomFieldError> {
    if spec.options.iter().any(|o| o == choice) {
        Ok(())
    } else {
        Err(CustomFieldError::InvalidOption {
            field: spec.field_key.clone(),
            value: choice.to_string(),
        })
    }
}
