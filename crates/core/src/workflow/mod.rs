//! Workflow templates and instances.
//!
//! A template is an ordered list of steps for an entity kind; an instance is
//! one run of a template against an entity. Instances move
//! `active -> completed` by advancing past the last step, or
//! `active -> cancelled`. Completed and cancelled instances are final.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (WorkflowStatus, WorkflowStep, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `service` - Template validation and instance transitions

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{StepCompletion, WorkflowAction, WorkflowStatus, WorkflowStep};
