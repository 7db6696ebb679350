//! Workflow error types for template validation and instance transitions.

use hearth_shared::AppError;
use thiserror::Error;

use crate::workflow::types::WorkflowStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Template has no steps.
    #[error("Workflow template must have at least one step")]
    NoSteps,

    /// Step has a blank name.
    #[error("Step {index} has an empty name")]
    EmptyStepName {
        /// Zero-based step position.
        index: usize,
    },

    /// Step key is blank or malformed.
    #[error("Invalid step key '{0}'")]
    InvalidStepKey(String),

    /// Two steps share a key.
    #[error("Duplicate step key '{0}'")]
    DuplicateStepKey(String),

    /// Template name is blank.
    #[error("Workflow template name cannot be empty")]
    EmptyName,

    /// Template is inactive and cannot start new instances.
    #[error("Workflow template is inactive")]
    TemplateInactive,

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: WorkflowStatus,
        /// The attempted target status.
        to: WorkflowStatus,
    },

    /// Stored step index does not fit the template.
    #[error("Current step {current} is outside a template of {total} steps")]
    StepOutOfRange {
        /// Stored step index.
        current: usize,
        /// Number of steps in the template.
        total: usize,
    },
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NoSteps
            | Self::EmptyStepName { .. }
            | Self::InvalidStepKey(_)
            | Self::DuplicateStepKey(_)
            | Self::EmptyName => 400,
            Self::TemplateInactive | Self::InvalidTransition { .. } | Self::StepOutOfRange { .. } => {
                422
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoSteps => "NO_STEPS",
            Self::EmptyStepName { .. } => "EMPTY_STEP_NAME",
            Self::InvalidStepKey(_) => "INVALID_STEP_KEY",
            Self::DuplicateStepKey(_) => "DUPLICATE_STEP_KEY",
            Self::EmptyName => "EMPTY_NAME",
            Self::TemplateInactive => "TEMPLATE_INACTIVE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::StepOutOfRange { .. } => "STEP_OUT_OF_RANGE",
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        if err.status_code() == 400 {
            Self::Validation(err.to_string())
        } else {
            Self::BusinessRule(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: WorkflowStatus::Completed,
            to: WorkflowStatus::Active,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "Invalid status transition from completed to active"
        );
        assert!(matches!(AppError::from(err), AppError::BusinessRule(_)));
    }

    #[test]
    fn test_template_errors_are_validation() {
        let err = WorkflowError::DuplicateStepKey("kyc".to_string());
        assert_eq!(err.status_code(), 400);
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}
