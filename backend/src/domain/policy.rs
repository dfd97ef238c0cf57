//! Access policy: pure, stateless role decisions.
//!
//! The table is total over [`ComplaintAction`]; "list mine" and "list all"
//! are distinct actions rather than one action with different filters, so
//! every (role, action) pair has exactly one answer.

use crate::domain::{Error, Identity, Role};

/// Operations gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplaintAction {
    /// Create a new complaint.
    Create,
    /// List the caller's own complaints.
    ListMine,
    /// List all complaints, optionally filtered.
    ListAll,
    /// Change a complaint's status.
    UpdateStatus,
}

/// Role required to perform the given action.
pub fn required_role(action: ComplaintAction) -> Role {
    match action {
        ComplaintAction::Create | ComplaintAction::ListMine => Role::Student,
        ComplaintAction::ListAll | ComplaintAction::UpdateStatus => Role::Admin,
    }
}

/// Allow or deny an action for the caller.
///
/// Returns [`Error`] with code `Forbidden` on any role mismatch; callers of
/// scoped reads additionally constrain the result set to the caller's own
/// records.
pub fn authorize(caller: &Identity, action: ComplaintAction) -> Result<(), Error> {
    if caller.role == required_role(action) {
        return Ok(());
    }
    let message = match action {
        ComplaintAction::Create => "only students can submit complaints",
        ComplaintAction::ListMine => "only students can view their own complaints",
        ComplaintAction::ListAll => "only admins can view all complaints",
        ComplaintAction::UpdateStatus => "only admins can update complaint status",
    };
    Err(Error::forbidden(message))
}
