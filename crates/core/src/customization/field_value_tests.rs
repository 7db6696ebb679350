//! Tests for custom field value typing.

use chrono::{TimeZone, Utc};
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use super::error::CustomFieldError;
use super::field_value::{validate_definition, validate_field_key, validate_field_value};
use super::types::{FieldDefinitionSpec, FieldType, TypedFieldValue};

fn risk_score() -> FieldDefinitionSpec {
    FieldDefinitionSpec::new("risk_score", FieldType::Number).with_range(Some(dec!(1)), Some(dec!(10)))
}

fn segment() -> FieldDefinitionSpec {
    FieldDefinitionSpec::new("segment", FieldType::Select).with_options(["hnw", "uhnw", "mass_affluent"])
}

// ============================================================================
// Required / null handling
// ============================================================================

#[test]
fn test_null_clears_optional_field() {
    let spec = risk_score();
    assert_eq!(validate_field_value(&spec, None).unwrap(), None);
    assert_eq!(validate_field_value(&spec, Some(&Value::Null)).unwrap(), None);
}

#[test]
fn test_missing_value_rejected_only_when_required() {
    let spec = risk_score().required();
    assert_eq!(
        validate_field_value(&spec, None),
        Err(CustomFieldError::Required("risk_score".to_string()))
    );
    assert_eq!(
        validate_field_value(&spec, Some(&Value::Null)),
        Err(CustomFieldError::Required("risk_score".to_string()))
    );
}

// ============================================================================
// Numeric family
// ============================================================================

#[rstest]
#[case(json!(7), dec!(7))]
#[case(json!("7.5"), dec!(7.5))]
#[case(json!(" 3 "), dec!(3))]
#[case(json!(1), dec!(1))]
#[case(json!(10), dec!(10))]
fn test_number_accepts_numbers_and_numeric_strings(
    #[case] raw: Value,
    #[case] expected: rust_decimal::Decimal,
) {
    assert_eq!(
        validate_field_value(&risk_score(), Some(&raw)).unwrap(),
        Some(TypedFieldValue::Number(expected))
    );
}

#[test]
fn test_non_numeric_string_is_rejected() {
    assert_eq!(
        validate_field_value(&risk_score(), Some(&json!("high"))),
        Err(CustomFieldError::InvalidNumber("risk_score".to_string()))
    );
    assert!(matches!(
        validate_field_value(&risk_score(), Some(&json!(true))),
        Err(CustomFieldError::InvalidNumber(_))
    ));
}

#[rstest]
#[case(json!(0))]
#[case(json!("10.01"))]
fn test_number_out_of_range(#[case] raw: Value) {
    assert!(matches!(
        validate_field_value(&risk_score(), Some(&raw)),
        Err(CustomFieldError::OutOfRange { .. })
    ));
}

#[test]
fn test_currency_and_percentage_use_number_column() {
    let fee = FieldDefinitionSpec::new("annual_fee", FieldType::Currency);
    let pct = FieldDefinitionSpec::new("equity_pct", FieldType::Percentage);

    assert_eq!(
        validate_field_value(&fee, Some(&json!("12500.00"))).unwrap(),
        Some(TypedFieldValue::Number(dec!(12500.00)))
    );
    assert_eq!(
        validate_field_value(&pct, Some(&json!(62.5))).unwrap(),
        Some(TypedFieldValue::Number(dec!(62.5)))
    );
}

#[rstest]
#[case::one_past_decimal_max(json!("79228162514264337593543950336"))]
#[case::huge_json_number(json!(1e300))]
#[case::huge_exponent(json!("1e400"))]
#[case::tiny_exponent(json!("1e-40"))]
fn test_number_beyond_decimal_range_is_rejected(#[case] raw: Value) {
    let balance = FieldDefinitionSpec::new("outside_assets", FieldType::Currency);
    assert_eq!(
        validate_field_value(&balance, Some(&raw)),
        Err(CustomFieldError::InvalidNumber("outside_assets".to_string()))
    );
}

#[test]
fn test_number_accepts_extremes_of_decimal_range() {
    let balance = FieldDefinitionSpec::new("outside_assets", FieldType::Currency);

    assert_eq!(
        validate_field_value(&balance, Some(&json!("79228162514264337593543950335"))).unwrap(),
        Some(TypedFieldValue::Number(rust_decimal::Decimal::MAX))
    );
    assert_eq!(
        validate_field_value(&balance, Some(&json!("1e-28"))).unwrap(),
        Some(TypedFieldValue::Number(rust_decimal::Decimal::new(1, 28)))
    );
    assert_eq!(
        validate_field_value(&risk_score(), Some(&json!("9.999999999999999999999999999"))).unwrap(),
        Some(TypedFieldValue::Number(dec!(9.999999999999999999999999999)))
    );
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_plain_date_stored_at_midnight_utc() {
    let spec = FieldDefinitionSpec::new("review_date", FieldType::Date);
    assert_eq!(
        validate_field_value(&spec, Some(&json!("2026-03-15"))).unwrap(),
        Some(TypedFieldValue::Date(
            Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap()
        ))
    );
}

#[test]
fn test_rfc3339_converted_to_utc() {
    let spec = FieldDefinitionSpec::new("last_contact", FieldType::Datetime);
    assert_eq!(
        validate_field_value(&spec, Some(&json!("2026-03-15T09:30:00-05:00"))).unwrap(),
        Some(TypedFieldValue::Date(
            Utc.with_ymd_and_hms(2026, 3, 15, 14, 30, 0).unwrap()
        ))
    );
}

#[rstest]
#[case(json!("2026-02-30"))]
#[case(json!("next tuesday"))]
#[case(json!(20260315))]
fn test_invalid_dates_rejected(#[case] raw: Value) {
    let spec = FieldDefinitionSpec::new("review_date", FieldType::Date);
    assert_eq!(
        validate_field_value(&spec, Some(&raw)),
        Err(CustomFieldError::InvalidDate("review_date".to_string()))
    );
}

// ============================================================================
// Choice types
// ============================================================================

#[test]
fn test_select_accepts_declared_option() {
    assert_eq!(
        validate_field_value(&segment(), Some(&json!("uhnw"))).unwrap(),
        Some(TypedFieldValue::Text("uhnw".to_string()))
    );
}

#[test]
fn test_select_rejects_unknown_option() {
    assert_eq!(
        validate_field_value(&segment(), Some(&json!("retail"))),
        Err(CustomFieldError::InvalidOption {
            field: "segment".to_string(),
            value: "retail".to_string(),
        })
    );
}

#[test]
fn test_multi_select_stored_as_json_array() {
    let spec = FieldDefinitionSpec::new("interests", FieldType::MultiSelect)
        .with_options(["golf", "philanthropy", "travel"]);

    assert_eq!(
        validate_field_value(&spec, Some(&json!(["golf", "travel"]))).unwrap(),
        Some(TypedFieldValue::Json(json!(["golf", "travel"])))
    );
    assert!(matches!(
        validate_field_value(&spec, Some(&json!(["golf", "sailing"]))),
        Err(CustomFieldError::InvalidOption { .. })
    ));
    assert!(matches!(
        validate_field_value(&spec, Some(&json!("golf"))),
        Err(CustomFieldError::ExpectedArray(_))
    ));
}

// ============================================================================
// Text family, boolean, json
// ============================================================================

#[test]
fn test_text_family() {
    let email = FieldDefinitionSpec::new("assistant_email", FieldType::Email);
    let url = FieldDefinitionSpec::new("website", FieldType::Url);
    let notes = FieldDefinitionSpec::new("notes", FieldType::Textarea);

    assert_eq!(
        validate_field_value(&email, Some(&json!("pa@smithfamily.com"))).unwrap(),
        Some(TypedFieldValue::Text("pa@smithfamily.com".to_string()))
    );
    assert!(matches!(
        validate_field_value(&email, Some(&json!("smithfamily.com"))),
        Err(CustomFieldError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_field_value(&url, Some(&json!("ftp://files"))),
        Err(CustomFieldError::InvalidUrl(_))
    ));
    assert!(matches!(
        validate_field_value(&notes, Some(&json!(42))),
        Err(CustomFieldError::ExpectedString(_))
    ));
}

#[rstest]
#[case(json!(true), true)]
#[case(json!(false), false)]
#[case(json!("true"), true)]
#[case(json!("false"), false)]
fn test_boolean_accepts_bool_or_string(#[case] raw: Value, #[case] expected: bool) {
    let spec = FieldDefinitionSpec::new("accredited", FieldType::Boolean);
    assert_eq!(
        validate_field_value(&spec, Some(&raw)).unwrap(),
        Some(TypedFieldValue::Boolean(expected))
    );
}

#[test]
fn test_boolean_rejects_other_strings() {
    let spec = FieldDefinitionSpec::new("accredited", FieldType::Boolean);
    assert!(matches!(
        validate_field_value(&spec, Some(&json!("yes"))),
        Err(CustomFieldError::InvalidBoolean(_))
    ));
}

#[test]
fn test_json_stored_raw() {
    let spec = FieldDefinitionSpec::new("beneficiaries", FieldType::Json);
    let raw = json!({ "primary": "Emma Smith", "share": 50 });
    assert_eq!(
        validate_field_value(&spec, Some(&raw)).unwrap(),
        Some(TypedFieldValue::Json(raw))
    );
}

// ============================================================================
// Definitions
// ============================================================================

#[rstest]
#[case("risk_score", true)]
#[case("a1", true)]
#[case("Risk", false)]
#[case("1st_contact", false)]
#[case("risk-score", false)]
#[case("", false)]
fn test_field_key_rules(#[case] key: &str, #[case] ok: bool) {
    assert_eq!(validate_field_key(key).is_ok(), ok);
}

#[test]
fn test_choice_definition_requires_options() {
    let spec = FieldDefinitionSpec::new("segment", FieldType::Select);
    assert_eq!(
        validate_definition(&spec),
        Err(CustomFieldError::MissingOptions("select"))
    );
    assert!(validate_definition(&segment()).is_ok());
}

#[test]
fn test_definition_rejects_duplicate_options() {
    let spec = FieldDefinitionSpec::new("segment", FieldType::Select).with_options(["hnw", "hnw"]);
    assert!(matches!(
        validate_definition(&spec),
        Err(CustomFieldError::InvalidOptions(_))
    ));
}

#[test]
fn test_definition_rejects_inverted_range() {
    let spec = FieldDefinitionSpec::new("risk_score", FieldType::Number)
        .with_range(Some(dec!(10)), Some(dec!(1)));
    assert_eq!(
        validate_definition(&spec),
        Err(CustomFieldError::InvalidRange {
            min: dec!(10),
            max: dec!(1),
        })
    );
}
