//! Custom field domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::CustomFieldError;

/// Record kinds that custom fields, tags and views attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Household.
    Household,
    /// Account.
    Account,
    /// Individual client.
    Client,
    /// Task.
    Task,
    /// Meeting.
    Meeting,
}

impl EntityType {
    /// All entity types.
    pub const ALL: [Self; 5] = [
        Self::Household,
        Self::Account,
        Self::Client,
        Self::Task,
        Self::Meeting,
    ];

    /// Returns the stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Account => "account",
            Self::Client => "client",
            Self::Task => "task",
            Self::Meeting => "meeting",
        }
    }

    /// Parses a stored or path name. Plural forms are accepted.
    pub fn parse(s: &str) -> Result<Self, CustomFieldError> {
        let lower = s.to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == lower || e.as_str() == singular)
            .ok_or_else(|| CustomFieldError::UnknownEntityType(s.to_string()))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Email address.
    Email,
    /// http(s) URL.
    Url,
    /// Phone number.
    Phone,
    /// Plain number.
    Number,
    /// Money amount.
    Currency,
    /// Percentage.
    Percentage,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
    /// True or false.
    Boolean,
    /// One choice from `options`.
    Select,
    /// Any subset of `options`.
    MultiSelect,
    /// Arbitrary JSON.
    Json,
}

impl FieldType {
    /// All field types.
    pub const ALL: [Self; 14] = [
        Self::Text,
        Self::Textarea,
        Self::Email,
        Self::Url,
        Self::Phone,
        Self::Number,
        Self::Currency,
        Self::Percentage,
        Self::Date,
        Self::Datetime,
        Self::Boolean,
        Self::Select,
        Self::MultiSelect,
        Self::Json,
    ];

    /// Returns the stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Url => "url",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Json => "json",
        }
    }

    /// Parses a stored name.
    pub fn parse(s: &str) -> Result<Self, CustomFieldError> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CustomFieldError::UnknownFieldType(s.to_string()))
    }

    /// Number, currency and percentage.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Currency | Self::Percentage)
    }

    /// Select and multi-select.
    #[must_use]
    pub const fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a field definition that govern value typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinitionSpec {
    /// Field key, used in error messages.
    pub field_key: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether a value must be present.
    pub is_required: bool,
    /// Choice list for select types.
    pub options: Vec<String>,
    /// Inclusive lower bound for numeric types.
    pub min_value: Option<Decimal>,
    /// Inclusive upper bound for numeric types.
    pub max_value: Option<Decimal>,
}

impl FieldDefinitionSpec {
    /// Creates an optional, unbounded definition with no options.
    #[must_use]
    pub fn new(field_key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_key: field_key.into(),
            field_type,
            is_required: false,
            options: Vec::new(),
            min_value: None,
            max_value: None,
        }
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Sets the choice list.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the numeric range.
    #[must_use]
    pub fn with_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }
}

/// A validated custom field value, tagged by the column it is stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedFieldValue {
    /// `value_text`.
    Text(String),
    /// `value_number`.
    Number(Decimal),
    /// `value_boolean`.
    Boolean(bool),
    /// `value_date`.
    Date(DateTime<Utc>),
    /// `value_json`.
    Json(Value),
}

/// The five typed columns of a value row. Exactly one is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueColumns {
    /// Text column.
    pub text: Option<String>,
    /// Number column.
    pub number: Option<Decimal>,
    /// Boolean column.
    pub boolean: Option<bool>,
    /// Date column.
    pub date: Option<DateTime<Utc>>,
    /// JSON column.
    pub json: Option<Value>,
}

impl TypedFieldValue {
    /// Spreads the value over the five storage columns.
    #[must_use]
    pub fn into_columns(self) -> ValueColumns {
        let mut columns = ValueColumns::default();
        match self {
            Self::Text(v) => columns.text = Some(v),
            Self::Number(v) => columns.number = Some(v),
            Self::Boolean(v) => columns.boolean = Some(v),
            Self::Date(v) => columns.date = Some(v),
            Self::Json(v) => columns.json = Some(v),
        }
        columns
    }

    /// Reads a value back from its storage columns, picking the first populated one.
    #[must_use]
    pub fn from_columns(columns: ValueColumns) -> Option<Self> {
        if let Some(v) = columns.text {
            return Some(Self::Text(v));
        }
        if let Some(v) = columns.number {
            return Some(Self::Number(v));
        }
        if let Some(v) = columns.boolean {
            return Some(Self::Boolean(v));
        }
        if let Some(v) = columns.date {
            return Some(Self::Date(v));
        }
        columns.json.map(Self::Json)
    }

    /// JSON representation returned to clients.
    ///
    /// Numbers are rendered as strings to keep full decimal precision.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(v) => Value::String(v.clone()),
            Self::Number(v) => Value::String(v.normalize().to_string()),
            Self::Boolean(v) => Value::Bool(*v),
            Self::Date(v) => Value::String(v.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::Json(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("household", EntityType::Household)]
    #[case("households", EntityType::Household)]
    #[case("Accounts", EntityType::Account)]
    #[case("meeting", EntityType::Meeting)]
    fn test_entity_type_parse(#[case] input: &str, #[case] expected: EntityType) {
        assert_eq!(EntityType::parse(input).unwrap(), expected);
    }

    #[test]
    fn test_entity_type_unknown() {
        assert!(matches!(
            EntityType::parse("portfolio"),
            Err(CustomFieldError::UnknownEntityType(_))
        ));
    }

    #[test]
    fn test_field_type_round_trip_names() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::parse(t.as_str()).unwrap(), t);
        }
        assert!(FieldType::parse("rich_text").is_err());
    }

    #[test]
    fn test_columns_hold_exactly_one_value() {
        let columns = TypedFieldValue::Number(dec!(12.50)).into_columns();
        assert_eq!(columns.number, Some(dec!(12.50)));
        assert!(columns.text.is_none());
        assert!(columns.boolean.is_none());
        assert!(columns.date.is_none());
        assert!(columns.json.is_none());

        assert_eq!(
            TypedFieldValue::from_columns(columns),
            Some(TypedFieldValue::Number(dec!(12.50)))
        );
        assert_eq!(TypedFieldValue::from_columns(ValueColumns::default()), None);
    }

    #[test]
    fn test_to_json_renders_numbers_as_strings() {
        assert_eq!(
            TypedFieldValue::Number(dec!(12.50)).to_json(),
            Value::String("12.5".to_string())
        );
        assert_eq!(TypedFieldValue::Boolean(true).to_json(), Value::Bool(true));
    }
}
