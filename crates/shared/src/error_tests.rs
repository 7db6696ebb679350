use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Unauthorized("test".into()), 401, "UNAUTHORIZED")]
#[case(AppError::Forbidden("test".into()), 403, "FORBIDDEN")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("test".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_status_and_error_code(
    #[case] error: AppError,
    #[case] status: u16,
    #[case] code: &str,
) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::NotFound("tag 42".into()).to_string(),
        "Not found: tag 42"
    );
    assert_eq!(
        AppError::Conflict("field key exists".into()).to_string(),
        "Conflict: field key exists"
    );
    assert_eq!(
        AppError::Validation("msg".into()).to_string(),
        "Validation error: msg"
    );
}

#[test]
fn test_internal_errors_are_flagged() {
    assert!(AppError::Database("x".into()).is_internal());
    assert!(AppError::Internal("x".into()).is_internal());
    assert!(!AppError::Validation("x".into()).is_internal());
    assert!(!AppError::Conflict("x".into()).is_internal());
}
