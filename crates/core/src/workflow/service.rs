//! Workflow service for template validation and instance transitions.

use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{StepCompletion, WorkflowAction, WorkflowStatus, WorkflowStep};

/// Maximum step key length.
pub const MAX_STEP_KEY_LEN: usize = 64;

/// Stateless service for workflow templates and instances.
pub struct WorkflowService;

impl WorkflowService {
    /// Validates a template name and step list.
    ///
    /// Requires a non-blank name, at least one step, non-blank step names,
    /// and unique step keys made of lowercase letters, digits and underscores.
    pub fn validate_template(name: &str, steps: &[WorkflowStep]) -> Result<(), WorkflowError> {
        if name.trim().is_empty() {
            return Err(WorkflowError::EmptyName);
        }
        Self::validate_steps(steps)
    }

    /// Validates a step list.
    pub fn validate_steps(steps: &[WorkflowStep]) -> Result<(), WorkflowError> {
        if steps.is_empty() {
            return Err(WorkflowError::NoSteps);
        }

        let mut keys = HashSet::new();
        for (index, step) in steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(WorkflowError::EmptyStepName { index });
            }
            if !is_valid_key(&step.key) {
                return Err(WorkflowError::InvalidStepKey(step.key.clone()));
            }
            if !keys.insert(step.key.as_str()) {
                return Err(WorkflowError::DuplicateStepKey(step.key.clone()));
            }
        }
        Ok(())
    }

    /// Checks a template can start a new instance.
    pub fn start(template_active: bool, steps: &[WorkflowStep]) -> Result<(), WorkflowError> {
        if !template_active {
            return Err(WorkflowError::TemplateInactive);
        }
        Self::validate_steps(steps)
    }

    /// Completes the current step of an active instance.
    ///
    /// Moves to the next step, or to `Completed` when the current step is the
    /// last one.
    pub fn advance(
        status: WorkflowStatus,
        current_step: usize,
        steps: &[WorkflowStep],
        completed_by: Uuid,
        notes: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        if status != WorkflowStatus::Active {
            return Err(WorkflowError::InvalidTransition {
                from: status,
                to: WorkflowStatus::Completed,
            });
        }

        let step = steps.get(current_step).ok_or(WorkflowError::StepOutOfRange {
            current: current_step,
            total: steps.len(),
        })?;

        let new_step = current_step + 1;
        let new_status = if new_step == steps.len() {
            WorkflowStatus::Completed
        } else {
            WorkflowStatus::Active
        };

        Ok(WorkflowAction::Advance {
            new_status,
            new_step,
            completion: StepCompletion {
                step_key: step.key.clone(),
                completed_by,
                completed_at: Utc::now(),
                notes: notes.filter(|n| !n.trim().is_empty()),
            },
        })
    }

    /// Cancels an active instance.
    pub fn cancel(
        status: WorkflowStatus,
        cancelled_by: Uuid,
        reason: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        match status {
            WorkflowStatus::Active => Ok(WorkflowAction::Cancel {
                new_status: WorkflowStatus::Cancelled,
                cancelled_by,
                cancelled_at: Utc::now(),
                reason: reason.filter(|r| !r.trim().is_empty()),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: status,
                to: WorkflowStatus::Cancelled,
            }),
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_STEP_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onboarding() -> Vec<WorkflowStep> {
        ["kyc", "risk_profile", "ips_signed"]
            .into_iter()
            .map(|key| WorkflowStep {
                key: key.to_string(),
                name: key.replace('_', " "),
                description: None,
                assignee_role: Some("operations".to_string()),
                due_in_days: Some(7),
            })
            .collect()
    }

    #[test]
    fn test_validate_template() {
        assert!(WorkflowService::validate_template("Client onboarding", &onboarding()).is_ok());
        assert_eq!(
            WorkflowService::validate_template(" ", &onboarding()),
            Err(WorkflowError::EmptyName)
        );
        assert_eq!(
            WorkflowService::validate_template("Empty", &[]),
            Err(WorkflowError::NoSteps)
        );
    }

    #[test]
    fn test_duplicate_and_invalid_keys() {
        let mut steps = onboarding();
        steps[2].key = "kyc".to_string();
        assert_eq!(
            WorkflowService::validate_steps(&steps),
            Err(WorkflowError::DuplicateStepKey("kyc".to_string()))
        );

        let mut steps = onboarding();
        steps[0].key = "KYC docs".to_string();
        assert!(matches!(
            WorkflowService::validate_steps(&steps),
            Err(WorkflowError::InvalidStepKey(_))
        ));

        let mut steps = onboarding();
        steps[1].name = String::new();
        assert_eq!(
            WorkflowService::validate_steps(&steps),
            Err(WorkflowError::EmptyStepName { index: 1 })
        );
    }

    #[test]
    fn test_advance_through_all_steps() {
        let steps = onboarding();
        let user = Uuid::new_v4();
        let mut status = WorkflowStatus::Active;
        let mut current = 0;

        for expected_key in ["kyc", "risk_profile", "ips_signed"] {
            let action =
                WorkflowService::advance(status, current, &steps, user, None).unwrap();
            let WorkflowAction::Advance {
                new_status,
                new_step,
                completion,
            } = action
            else {
                panic!("expected Advance");
            };
            assert_eq!(completion.step_key, expected_key);
            assert_eq!(completion.completed_by, user);
            status = new_status;
            current = new_step;
        }

        assert_eq!(status, WorkflowStatus::Completed);
        assert_eq!(current, 3);
    }

    #[test]
    fn test_completed_instance_cannot_advance_or_cancel() {
        let steps = onboarding();
        let user = Uuid::new_v4();
        assert!(matches!(
            WorkflowService::advance(WorkflowStatus::Completed, 3, &steps, user, None),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            WorkflowService::cancel(WorkflowStatus::Completed, user, None),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_step_out_of_range() {
        let steps = onboarding();
        assert_eq!(
            WorkflowService::advance(WorkflowStatus::Active, 5, &steps, Uuid::nil(), None),
            Err(WorkflowError::StepOutOfRange {
                current: 5,
                total: 3
            })
        );
    }

    #[test]
    fn test_inactive_template_cannot_start() {
        assert_eq!(
            WorkflowService::start(false, &onboarding()),
            Err(WorkflowError::TemplateInactive)
        );
        assert!(WorkflowService::start(true, &onboarding()).is_ok());
    }

    #[test]
    fn test_blank_reason_dropped() {
        let action =
            WorkflowService::cancel(WorkflowStatus::Active, Uuid::nil(), Some("  ".to_string()))
                .unwrap();
        assert!(matches!(action, WorkflowAction::Cancel { reason: None, .. }));
    }
}
