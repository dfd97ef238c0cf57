//! Port for complaint persistence and joined owner reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Category, Complaint, ComplaintFilter, ComplaintWithOwner, Description, OwnerSummary, Priority,
    Status,
};

/// Errors raised by complaint repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplaintRepositoryError {
    /// Repository connection could not be established.
    #[error("complaint repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("complaint repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl ComplaintRepositoryError {
    /// Build a [`ComplaintRepositoryError::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`ComplaintRepositoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fields of a complaint yet to be persisted.
///
/// Identifier, status, and timestamps are assigned by the adapter; every
/// inserted record starts in [`Status::Pending`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaintRecord {
    /// Identifier of the creating identity.
    pub owner_id: i64,
    /// Fault category.
    pub category: Category,
    /// Validated description.
    pub description: Description,
    /// Urgency.
    pub priority: Priority,
    /// Storage name of the staged attachment, when one was supplied.
    pub attachment_ref: Option<String>,
}

/// Port for writing complaints and reading them joined with their owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Persist a new complaint and return it joined with its owner.
    async fn insert(
        &self,
        record: NewComplaintRecord,
    ) -> Result<ComplaintWithOwner, ComplaintRepositoryError>;

    /// Find a complaint by id.
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError>;

    /// List an owner's complaints, newest first.
    async fn list_for_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError>;

    /// List all complaints matching the filter, newest first.
    async fn list_filtered(
        &self,
        filter: ComplaintFilter,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError>;

    /// Set a complaint's status and refresh its `updated_at` instant.
    ///
    /// Returns `None` when no record has the given id.
    async fn update_status(
        &self,
        id: i64,
        status: Status,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError>;
}

/// In-memory fixture used by tests and fixture-backed servers.
#[derive(Debug, Default)]
pub struct FixtureComplaintRepository {
    records: std::sync::Mutex<Vec<ComplaintWithOwner>>,
}

impl FixtureComplaintRepository {
    fn owner_for(owner_id: i64) -> OwnerSummary {
        OwnerSummary {
            id: owner_id,
            name: format!("Fixture User {owner_id}"),
            email: format!("user{owner_id}@fixture.example"),
        }
    }
}

#[async_trait]
impl ComplaintRepository for FixtureComplaintRepository {
    async fn insert(
        &self,
        record: NewComplaintRecord,
    ) -> Result<ComplaintWithOwner, ComplaintRepositoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| ComplaintRepositoryError::query("fixture lock poisoned"))?;
        let now = Utc::now();
        let id = i64::try_from(records.len())
            .map_err(|_| ComplaintRepositoryError::query("fixture id overflow"))?
            + 1;
        let inserted = ComplaintWithOwner {
            complaint: Complaint {
                id,
                owner_id: record.owner_id,
                category: record.category,
                description: record.description,
                priority: record.priority,
                status: Status::Pending,
                attachment_ref: record.attachment_ref,
                created_at: now,
                updated_at: now,
            },
            owner: Self::owner_for(record.owner_id),
        };
        records.push(inserted.clone());
        Ok(inserted)
    }

    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| ComplaintRepositoryError::query("fixture lock poisoned"))?;
        Ok(records.iter().find(|row| row.complaint.id == id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| ComplaintRepositoryError::query("fixture lock poisoned"))?;
        let mut rows: Vec<_> = records
            .iter()
            .filter(|row| row.complaint.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.complaint.created_at.cmp(&a.complaint.created_at));
        Ok(rows)
    }

    async fn list_filtered(
        &self,
        filter: ComplaintFilter,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| ComplaintRepositoryError::query("fixture lock poisoned"))?;
        let mut rows: Vec<_> = records
            .iter()
            .filter(|row| {
                filter
                    .status
                    .is_none_or(|status| row.complaint.status == status)
                    && filter
                        .category
                        .is_none_or(|category| row.complaint.category == category)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.complaint.created_at.cmp(&a.complaint.created_at));
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: i64,
        status: Status,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| ComplaintRepositoryError::query("fixture lock poisoned"))?;
        let Some(row) = records.iter_mut().find(|row| row.complaint.id == id) else {
            return Ok(None);
        };
        row.complaint.status = status;
        row.complaint.updated_at = updated_at;
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn record(owner_id: i64) -> NewComplaintRecord {
        NewComplaintRecord {
            owner_id,
            category: Category::Plumbing,
            description: Description::new("tap is dripping through the night")
                .expect("valid description"),
            priority: Priority::High,
            attachment_ref: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_insert_starts_pending() {
        let repo = FixtureComplaintRepository::default();
        let inserted = repo.insert(record(1)).await.expect("insert succeeds");
        assert_eq!(inserted.complaint.status, Status::Pending);
        assert_eq!(inserted.complaint.created_at, inserted.complaint.updated_at);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_list_is_scoped_to_owner() {
        let repo = FixtureComplaintRepository::default();
        repo.insert(record(1)).await.expect("insert succeeds");
        repo.insert(record(2)).await.expect("insert succeeds");

        let rows = repo.list_for_owner(1).await.expect("list succeeds");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].complaint.owner_id, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_update_status_misses_unknown_id() {
        let repo = FixtureComplaintRepository::default();
        let updated = repo
            .update_status(99, Status::Resolved, Utc::now())
            .await
            .expect("update succeeds");
        assert!(updated.is_none());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = ComplaintRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
