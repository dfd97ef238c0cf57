//! PostgreSQL-backed `ComplaintRepository` implementation using Diesel ORM.
//!
//! Reads always join the owning user so the domain receives complete
//! [`ComplaintWithOwner`] values; stored enum strings re-enter the domain
//! through the canonical parsers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    ComplaintRepository, ComplaintRepositoryError, NewComplaintRecord,
};
use crate::domain::{
    Category, Complaint, ComplaintFilter, ComplaintWithOwner, Description, OwnerSummary, Priority,
    Status,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ComplaintRow, NewComplaintRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{complaints, users};

/// Diesel-backed implementation of the complaint repository port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ComplaintRepositoryError {
    map_basic_pool_error(error, ComplaintRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ComplaintRepositoryError {
    map_basic_diesel_error(
        error,
        ComplaintRepositoryError::query,
        ComplaintRepositoryError::connection,
    )
}

/// Convert a joined database row into a validated domain complaint.
fn row_to_complaint(
    row: ComplaintRow,
    owner: UserRow,
) -> Result<ComplaintWithOwner, ComplaintRepositoryError> {
    let category = row.category.parse::<Category>().map_err(|err| {
        ComplaintRepositoryError::query(format!("decode category for complaint {}: {err}", row.id))
    })?;
    let priority = row.priority.parse::<Priority>().map_err(|err| {
        ComplaintRepositoryError::query(format!("decode priority for complaint {}: {err}", row.id))
    })?;
    let status = row.status.parse::<Status>().map_err(|err| {
        ComplaintRepositoryError::query(format!("decode status for complaint {}: {err}", row.id))
    })?;
    let description = Description::new(row.description).map_err(|err| {
        ComplaintRepositoryError::query(format!(
            "decode description for complaint {}: {err}",
            row.id
        ))
    })?;

    Ok(ComplaintWithOwner {
        complaint: Complaint {
            id: row.id,
            owner_id: row.owner_id,
            category,
            description,
            priority,
            status,
            attachment_ref: row.attachment_ref,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
        owner: OwnerSummary {
            id: owner.id,
            name: owner.name,
            email: owner.email,
        },
    })
}

impl DieselComplaintRepository {
    async fn load_owner(
        &self,
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        owner_id: i64,
    ) -> Result<UserRow, ComplaintRepositoryError> {
        users::table
            .find(owner_id)
            .select(UserRow::as_select())
            .first(conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(
        &self,
        record: NewComplaintRecord,
    ) -> Result<ComplaintWithOwner, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewComplaintRow {
            owner_id: record.owner_id,
            category: record.category.as_str(),
            description: record.description.as_ref(),
            priority: record.priority.as_str(),
            status: Status::Pending.as_str(),
            attachment_ref: record.attachment_ref.as_deref(),
        };

        let row: ComplaintRow = diesel::insert_into(complaints::table)
            .values(&new_row)
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let owner = self.load_owner(&mut conn, row.owner_id).await?;
        row_to_complaint(row, owner)
    }

    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(ComplaintRow, UserRow)> = complaints::table
            .inner_join(users::table)
            .filter(complaints::id.eq(id))
            .select((ComplaintRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(complaint, owner)| row_to_complaint(complaint, owner))
            .transpose()
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ComplaintRow, UserRow)> = complaints::table
            .inner_join(users::table)
            .filter(complaints::owner_id.eq(owner_id))
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .select((ComplaintRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(complaint, owner)| row_to_complaint(complaint, owner))
            .collect()
    }

    async fn list_filtered(
        &self,
        filter: ComplaintFilter,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = complaints::table
            .inner_join(users::table)
            .select((ComplaintRow::as_select(), UserRow::as_select()))
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(complaints::status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(complaints::category.eq(category.as_str()));
        }

        let rows: Vec<(ComplaintRow, UserRow)> = query
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(complaint, owner)| row_to_complaint(complaint, owner))
            .collect()
    }

    async fn update_status(
        &self,
        id: i64,
        status: Status,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ComplaintRow> = diesel::update(complaints::table.find(id))
            .set((
                complaints::status.eq(status.as_str()),
                complaints::updated_at.eq(updated_at),
            ))
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let owner = self.load_owner(&mut conn, row.owner_id).await?;
        row_to_complaint(row, owner).map(Some)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> (ComplaintRow, UserRow) {
        let now = Utc::now();
        (
            ComplaintRow {
                id: 7,
                owner_id: 1,
                category: "Plumbing".to_owned(),
                description: "The shower drain is blocked.".to_owned(),
                priority: "High".to_owned(),
                status: "Pending".to_owned(),
                attachment_ref: None,
                created_at: now,
                updated_at: now,
            },
            UserRow {
                id: 1,
                name: "Alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_digest: "digest".to_owned(),
                role: "student".to_owned(),
                created_at: now,
                updated_at: now,
            },
        )
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            ComplaintRepositoryError::Connection { .. }
        ));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, ComplaintRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_builds_the_joined_view(valid_row: (ComplaintRow, UserRow)) {
        let (complaint, owner) = valid_row;
        let converted = row_to_complaint(complaint, owner).expect("valid row converts");

        assert_eq!(converted.complaint.category, Category::Plumbing);
        assert_eq!(converted.complaint.status, Status::Pending);
        assert_eq!(converted.owner.email, "alice@example.com");
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(valid_row: (ComplaintRow, UserRow)) {
        let (mut complaint, owner) = valid_row;
        complaint.status = "Closed".to_owned();

        let error = row_to_complaint(complaint, owner).expect_err("unknown status must fail");
        assert!(matches!(error, ComplaintRepositoryError::Query { .. }));
        assert!(error.to_string().contains("decode status"));
    }

    #[rstest]
    fn row_conversion_rejects_legacy_status_spelling(valid_row: (ComplaintRow, UserRow)) {
        let (mut complaint, owner) = valid_row;
        complaint.status = "In Progress".to_owned();

        assert!(row_to_complaint(complaint, owner).is_err());
    }
}
