//! Driving port for complaint mutations.

use async_trait::async_trait;

use crate::domain::{AttachmentUpload, ComplaintWithOwner, Error, Identity};

/// Raw creation fields as supplied by an inbound adapter.
///
/// Values are deliberately unparsed strings; the lifecycle service owns the
/// canonical validation so every adapter reports identical errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateComplaintRequest {
    /// Requested category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Requested priority; omitted or unrecognised values default to Medium.
    pub priority: Option<String>,
}

/// Port for creating complaints and updating their status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    /// Create a complaint on behalf of the caller, staging the optional
    /// attachment before the record is persisted.
    async fn create(
        &self,
        caller: &Identity,
        request: CreateComplaintRequest,
        attachment: Option<AttachmentUpload>,
    ) -> Result<ComplaintWithOwner, Error>;

    /// Move the identified complaint to the requested status.
    async fn update_status(
        &self,
        caller: &Identity,
        id: i64,
        status: &str,
    ) -> Result<ComplaintWithOwner, Error>;
}

/// Fixture implementation for tests that do not exercise mutations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureComplaintCommand;

#[async_trait]
impl ComplaintCommand for FixtureComplaintCommand {
    async fn create(
        &self,
        _caller: &Identity,
        _request: CreateComplaintRequest,
        _attachment: Option<AttachmentUpload>,
    ) -> Result<ComplaintWithOwner, Error> {
        Err(Error::service_unavailable("complaint commands are not wired"))
    }

    async fn update_status(
        &self,
        _caller: &Identity,
        _id: i64,
        _status: &str,
    ) -> Result<ComplaintWithOwner, Error> {
        Err(Error::service_unavailable("complaint commands are not wired"))
    }
}
