//! Shared types, errors, and configuration for Hearth.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token handling

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::{AppConfig, JwtSettings, ScoringConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
