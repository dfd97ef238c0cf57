//! Caller identity and role primitives.
//!
//! An [`Identity`] is produced fresh for every request by the identity
//! resolver port; it is never cached server-side beyond request scope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Resident who files and views their own complaints.
    Student,
    /// Administrator who triages and manages all complaints.
    Admin,
}

impl Role {
    /// Canonical lower-case string form, as stored and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be one of: student, admin")]
pub struct RoleParseError;

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError),
        }
    }
}

/// Authenticated caller of an operation.
///
/// ## Invariants
/// - Immutable for the lifetime of a request.
/// - Resolved from the presented credential on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user identifier.
    pub id: i64,
    /// Role the caller holds.
    pub role: Role,
}

impl Identity {
    /// Construct an identity from its parts.
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether the caller holds the student role.
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Whether the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Minimal owner projection joined onto complaint reads.
///
/// Name and email are sourced from the identity store; this subsystem never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    /// Owner's user identifier.
    pub id: i64,
    /// Owner's display name.
    pub name: String,
    /// Owner's email address.
    pub email: String,
}
