//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserRecord, StoredUser, UserDirectory, UserDirectoryError};
use crate::domain::{Identity, Role};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain directory errors.
fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, UserDirectoryError::connection)
}

/// Map Diesel errors to domain directory errors.
fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

/// Parse a stored role string, rejecting rows written outside this adapter.
fn parse_role(raw: &str, user_id: i64) -> Result<Role, UserDirectoryError> {
    raw.parse::<Role>()
        .map_err(|err| UserDirectoryError::query(format!("decode role for user {user_id}: {err}")))
}

fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserDirectoryError> {
    let role = parse_role(&row.role, row.id)?;
    Ok(StoredUser {
        identity: Identity::new(row.id, role),
        name: row.name,
        email: row.email,
        password_digest: row.password_digest,
    })
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn create(&self, record: NewUserRecord) -> Result<Identity, UserDirectoryError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: &record.name,
            email: &record.email,
            password_digest: &record.password_digest,
            role: record.role.as_str(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserDirectoryError::email_taken(record.email.clone())
                }
                other => map_diesel_error(other),
            })?;

        let role = parse_role(&row.role, row.id)?;
        Ok(Identity::new(row.id, role))
    }

    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| parse_role(&row.role, row.id).map(|role| Identity::new(row.id, role)))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored_user).transpose()
    }
}
