//! Authentication and authorization primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions and the permission checks route guards rely on

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// User roles within the firm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, manages field definitions and firm settings.
    Admin,
    /// Owns households, sets goals, sees peer rankings.
    Advisor,
    /// Back-office staff: records, tags, workflows.
    Operations,
    /// Read access plus firm-level reporting.
    Compliance,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Advisor => "advisor",
            Self::Operations => "operations",
            Self::Compliance => "compliance",
            Self::Viewer => "viewer",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "advisor" => Some(Self::Advisor),
            "operations" => Some(Self::Operations),
            "compliance" => Some(Self::Compliance),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns true if this role can create or change records at all.
    #[must_use]
    pub const fn can_write(&self) -> bool {
        !matches!(self, Self::Viewer)
    }

    /// Returns true if this role can manage custom field definitions.
    #[must_use]
    pub const fn can_manage_fields(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role can create, edit, or retire tags.
    #[must_use]
    pub const fn can_manage_tags(&self) -> bool {
        matches!(self, Self::Admin | Self::Advisor | Self::Operations)
    }

    /// Returns true if this role can enter profitability inputs.
    #[must_use]
    pub const fn can_edit_profitability(&self) -> bool {
        matches!(self, Self::Admin | Self::Advisor | Self::Operations)
    }

    /// Returns true if this role can view firm-wide metrics.
    #[must_use]
    pub const fn can_view_firm_metrics(&self) -> bool {
        matches!(self, Self::Admin | Self::Compliance)
    }

    /// Returns true if this role can see advisor rankings.
    #[must_use]
    pub const fn can_view_rankings(&self) -> bool {
        matches!(self, Self::Admin | Self::Advisor)
    }

    /// Returns true if this role can set advisor goals.
    #[must_use]
    pub const fn can_set_goals(&self) -> bool {
        matches!(self, Self::Admin | Self::Advisor)
    }

    /// Returns true if this role can manage workflow templates.
    #[must_use]
    pub const fn can_manage_workflows(&self) -> bool {
        matches!(self, Self::Admin | Self::Operations)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            UserRole::Admin,
            UserRole::Advisor,
            UserRole::Operations,
            UserRole::Compliance,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_fields());
        assert!(!UserRole::Advisor.can_manage_fields());

        assert!(UserRole::Operations.can_manage_tags());
        assert!(!UserRole::Compliance.can_manage_tags());

        assert!(UserRole::Compliance.can_view_firm_metrics());
        assert!(!UserRole::Advisor.can_view_firm_metrics());

        assert!(UserRole::Advisor.can_set_goals());
        assert!(!UserRole::Operations.can_set_goals());

        assert!(!UserRole::Viewer.can_write());
        assert!(UserRole::Compliance.can_write());
    }
}
