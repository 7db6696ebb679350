//! Customization error types.

use hearth_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while defining custom fields or typing their values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomFieldError {
    /// Unknown field type name.
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    /// Unknown entity type name.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Field keys are lowercase snake case.
    #[error("Invalid field key '{0}': use lowercase letters, digits and underscores, starting with a letter")]
    InvalidFieldKey(String),

    /// Label is blank.
    #[error("Field label cannot be empty")]
    EmptyLabel,

    /// Choice fields need at least one option.
    #[error("Field type {0} requires at least one option")]
    MissingOptions(&'static str),

    /// Duplicate or blank choice option.
    #[error("Invalid option list: {0}")]
    InvalidOptions(String),

    /// Declared min is above declared max.
    #[error("Minimum {min} is greater than maximum {max}")]
    InvalidRange {
        /// Declared minimum.
        min: Decimal,
        /// Declared maximum.
        max: Decimal,
    },

    /// Value missing for a required field.
    #[error("Field '{0}' is required")]
    Required(String),

    /// Value is not a number.
    #[error("Field '{0}' expects a number")]
    InvalidNumber(String),

    /// Number outside the declared range.
    #[error("Field '{field}' value {value} is out of range")]
    OutOfRange {
        /// Field key.
        field: String,
        /// Offending value.
        value: Decimal,
    },

    /// Value is not a valid date.
    #[error("Field '{0}' expects a date (YYYY-MM-DD or RFC 3339)")]
    InvalidDate(String),

    /// Value is not one of the declared options.
    #[error("Field '{field}' does not allow option '{value}'")]
    InvalidOption {
        /// Field key.
        field: String,
        /// Offending value.
        value: String,
    },

    /// Value should be a string.
    #[error("Field '{0}' expects a string")]
    ExpectedString(String),

    /// Value should be an array.
    #[error("Field '{0}' expects an array of options")]
    ExpectedArray(String),

    /// Value should be a boolean.
    #[error("Field '{0}' expects true or false")]
    InvalidBoolean(String),

    /// Value is not a plausible email address.
    #[error("Field '{0}' expects an email address")]
    InvalidEmail(String),

    /// Value is not an http(s) URL.
    #[error("Field '{0}' expects an http or https URL")]
    InvalidUrl(String),
}

impl From<CustomFieldError> for AppError {
    fn from(err: CustomFieldError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Tag naming and hierarchy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// Name is blank.
    #[error("Tag name cannot be empty")]
    EmptyName,

    /// Name is too long.
    #[error("Tag name cannot exceed {0} characters")]
    NameTooLong(usize),

    /// Color is not `#RRGGBB`.
    #[error("Invalid tag color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// Tag set as its own parent.
    #[error("A tag cannot be its own parent")]
    SelfParent,

    /// New parent is a descendant of the tag.
    #[error("Parent would create a cycle in the tag hierarchy")]
    Cycle,
}

impl From<TagError> for AppError {
    fn from(err: TagError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Saved view and preference errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// Name is blank.
    #[error("View name cannot be empty")]
    EmptyName,

    /// Config is malformed.
    #[error("Invalid view config: {0}")]
    InvalidConfig(String),

    /// Preference key is malformed.
    #[error("Invalid preference key '{0}'")]
    InvalidPreferenceKey(String),
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        Self::Validation(err.to_string())
    }
}
