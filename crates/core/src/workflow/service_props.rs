//! Property-based tests for WorkflowService.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{WorkflowAction, WorkflowStatus, WorkflowStep};

/// Strategy for generating random WorkflowStatus values.
fn arb_status() -> impl Strategy<Value = WorkflowStatus> {
    prop_oneof![
        Just(WorkflowStatus::Active),
        Just(WorkflowStatus::Completed),
        Just(WorkflowStatus::Cancelled),
    ]
}

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for generating templates with 1..8 distinct steps.
fn arb_steps() -> impl Strategy<Value = Vec<WorkflowStep>> {
    (1usize..8).prop_map(|n| {
        (0..n)
            .map(|i| WorkflowStep {
                key: format!("step_{i}"),
                name: format!("Step {i}"),
                description: None,
                assignee_role: None,
                due_in_days: None,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Final states reject every transition.
    #[test]
    fn prop_final_states_are_terminal(
        status in arb_status(),
        steps in arb_steps(),
        user in arb_uuid(),
    ) {
        prop_assume!(status.is_final());
        let advance = WorkflowService::advance(status, 0, &steps, user, None);
        let is_invalid_transition = matches!(advance, Err(WorkflowError::InvalidTransition { .. }));
        prop_assert!(is_invalid_transition);
        let cancel = WorkflowService::cancel(status, user, None);
        let is_invalid_transition = matches!(cancel, Err(WorkflowError::InvalidTransition { .. }));
        prop_assert!(is_invalid_transition);
    }

    /// Advancing n times completes an n-step template, never earlier.
    #[test]
    fn prop_completes_after_exactly_n_advances(steps in arb_steps(), user in arb_uuid()) {
        let mut status = WorkflowStatus::Active;
        let mut current = 0;
        for i in 0..steps.len() {
            prop_assert_eq!(status, WorkflowStatus::Active);
            let action = WorkflowService::advance(status, current, &steps, user, None).unwrap();
            if let WorkflowAction::Advance { new_status, new_step, completion } = action {
                prop_assert_eq!(completion.step_key, format!("step_{i}"));
                status = new_status;
                current = new_step;
            } else {
                prop_assert!(false, "Expected Advance action");
            }
        }
        prop_assert_eq!(status, WorkflowStatus::Completed);
        prop_assert_eq!(current, steps.len());
    }

    /// Cancelling an active instance always lands in Cancelled.
    #[test]
    fn prop_cancel_from_active(user in arb_uuid()) {
        let action = WorkflowService::cancel(WorkflowStatus::Active, user, None).unwrap();
        prop_assert_eq!(action.new_status(), WorkflowStatus::Cancelled);
    }
}
