//! Workflow domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of a workflow instance.
///
/// The valid transitions are:
/// - Active → Active (advance to the next step)
/// - Active → Completed (advance past the last step)
/// - Active → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Instance is in progress.
    Active,
    /// All steps are done (final).
    Completed,
    /// Instance was abandoned (final).
    Cancelled,
}

impl WorkflowStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a workflow template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Stable key, unique within the template.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Optional instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Role expected to perform the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_role: Option<String>,
    /// Days after the instance starts by which the step is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_in_days: Option<u32>,
}

/// Record of a finished step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletion {
    /// Key of the finished step.
    pub step_key: String,
    /// Who finished it.
    pub completed_by: Uuid,
    /// When.
    pub completed_at: DateTime<Utc>,
    /// Optional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of a transition, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Current step finished.
    Advance {
        /// Status after the transition.
        new_status: WorkflowStatus,
        /// Step index after the transition (equals step count once completed).
        new_step: usize,
        /// Completion record to append.
        completion: StepCompletion,
    },
    /// Instance cancelled.
    Cancel {
        /// Always `Cancelled`.
        new_status: WorkflowStatus,
        /// Who cancelled.
        cancelled_by: Uuid,
        /// When.
        cancelled_at: DateTime<Utc>,
        /// Optional reason.
        reason: Option<String>,
    },
}

impl WorkflowAction {
    /// Returns the status after the action.
    #[must_use]
    pub const fn new_status(&self) -> WorkflowStatus {
        match self {
            Self::Advance { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(WorkflowStatus::parse("ACTIVE"), Some(WorkflowStatus::Active));
        assert_eq!(WorkflowStatus::parse("canceled"), Some(WorkflowStatus::Cancelled));
        assert_eq!(WorkflowStatus::parse("paused"), None);
    }

    #[test]
    fn test_final_states() {
        assert!(!WorkflowStatus::Active.is_final());
        assert!(WorkflowStatus::Completed.is_final());
        assert!(WorkflowStatus::Cancelled.is_final());
    }

    #[test]
    fn test_step_deserializes_with_optional_fields() {
        let step: WorkflowStep =
            serde_json::from_str(r#"{"key":"kyc","name":"Collect KYC documents"}"#).unwrap();
        assert_eq!(step.key, "kyc");
        assert!(step.description.is_none());
        assert!(step.due_in_days.is_none());
    }
}
