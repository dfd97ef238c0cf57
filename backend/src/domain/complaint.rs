//! Complaint aggregate and its closed enums.
//!
//! Each enum has exactly one canonical validator (its [`FromStr`] impl);
//! creation, filtering, and status updates all parse through it rather than
//! re-checking string literals at call sites.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::OwnerSummary;

/// Complaint category, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Electrical faults.
    Electrical,
    /// Plumbing faults.
    Plumbing,
    /// Cleaning requests.
    Cleaning,
    /// Anything else.
    Other,
}

impl Category {
    /// Canonical string form, as stored and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Cleaning => "Cleaning",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category must be one of: Electrical, Plumbing, Cleaning, Other")]
pub struct CategoryParseError;

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Electrical" => Ok(Self::Electrical),
            "Plumbing" => Ok(Self::Plumbing),
            "Cleaning" => Ok(Self::Cleaning),
            "Other" => Ok(Self::Other),
            _ => Err(CategoryParseError),
        }
    }
}

/// Complaint priority, fixed at creation.
///
/// An omitted or unrecognised priority silently falls back to
/// [`Priority::Medium`]; it is the one creation field that never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Low urgency.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// High urgency.
    High,
}

impl Priority {
    /// Canonical string form, as stored and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parse a client-supplied priority, defaulting on `None` or any
    /// unrecognised value.
    pub fn from_request(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a priority.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("priority must be one of: Low, Medium, High")]
pub struct PriorityParseError;

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            _ => Err(PriorityParseError),
        }
    }
}

/// Workflow status, the only mutable complaint field.
///
/// The transition graph is fully connected: any status may move to any
/// other, including itself, and nothing is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Awaiting triage; the state every complaint is created in.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Work finished; may be reopened.
    Resolved,
}

impl Status {
    /// Canonical string form, as stored and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of: Pending, InProgress, Resolved")]
pub struct StatusParseError;

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "InProgress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            _ => Err(StatusParseError),
        }
    }
}

/// Minimum description length in characters, inclusive.
pub const DESCRIPTION_MIN: usize = 10;
/// Maximum description length in characters, inclusive.
pub const DESCRIPTION_MAX: usize = 1000;

/// Error returned when a description is out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters")]
pub struct DescriptionLengthError;

/// Complaint description, length constrained to
/// [`DESCRIPTION_MIN`]..=[`DESCRIPTION_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Validate and construct a description.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptionLengthError> {
        let value = value.into();
        let length = value.chars().count();
        if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
            return Err(DescriptionLengthError);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for Description {
    type Error = DescriptionLengthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

/// Persisted complaint record.
///
/// ## Invariants
/// - Exactly one owner, set at creation and never changed.
/// - `status` is the only field mutated after creation.
/// - `attachment_ref`, once set, is never modified or cleared, and the
///   referenced binary exists for as long as the record does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Store-assigned identifier.
    pub id: i64,
    /// Identifier of the creating identity.
    pub owner_id: i64,
    /// Fault category.
    pub category: Category,
    /// Free-text description.
    pub description: Description,
    /// Urgency.
    pub priority: Priority,
    /// Workflow status.
    pub status: Status,
    /// Opaque reference to the stored attachment, when one was supplied.
    pub attachment_ref: Option<String>,
    /// Creation instant, set once.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status change.
    pub updated_at: DateTime<Utc>,
}

/// Complaint joined with the minimal owner projection returned by reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintWithOwner {
    /// The complaint record.
    #[serde(flatten)]
    pub complaint: Complaint,
    /// Minimal identity fields of the owner.
    pub owner: OwnerSummary,
}

/// Validated equality filters for the admin listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Restrict to complaints in this status.
    pub status: Option<Status>,
    /// Restrict to complaints in this category.
    pub category: Option<Category>,
}
