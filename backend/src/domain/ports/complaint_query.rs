//! Driving port for complaint reads.

use async_trait::async_trait;

use crate::domain::{ComplaintWithOwner, Error, Identity};

/// Raw listing filters as supplied by an inbound adapter.
///
/// Unlike priorities at creation, unrecognised filter values are rejected
/// rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintListFilter {
    /// Restrict to complaints in this status.
    pub status: Option<String>,
    /// Restrict to complaints in this category.
    pub category: Option<String>,
}

/// Port for listing complaints, always newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintQuery: Send + Sync {
    /// List the caller's own complaints.
    async fn list_mine(&self, caller: &Identity) -> Result<Vec<ComplaintWithOwner>, Error>;

    /// List all complaints matching the filter.
    async fn list_all(
        &self,
        caller: &Identity,
        filter: ComplaintListFilter,
    ) -> Result<Vec<ComplaintWithOwner>, Error>;
}

/// Fixture implementation for tests that do not exercise reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureComplaintQuery;

#[async_trait]
impl ComplaintQuery for FixtureComplaintQuery {
    async fn list_mine(&self, _caller: &Identity) -> Result<Vec<ComplaintWithOwner>, Error> {
        Ok(Vec::new())
    }

    async fn list_all(
        &self,
        _caller: &Identity,
        _filter: ComplaintListFilter,
    ) -> Result<Vec<ComplaintWithOwner>, Error> {
        Ok(Vec::new())
    }
}
