//! Core business logic for Hearth.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Roles and password hashing
//! - `period` - Monthly/quarterly/annual period bucketing
//! - `profitability` - Household profitability scoring and tiers
//! - `analytics` - Percentile rankings, goal progress, activity totals, dashboards
//! - `customization` - Custom field typing, tag hierarchy, saved view configs
//! - `workflow` - Workflow templates and instance state machine

pub mod analytics;
pub mod auth;
pub mod customization;
pub mod period;
pub mod profitability;
pub mod workflow;
