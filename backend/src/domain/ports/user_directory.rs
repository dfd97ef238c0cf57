//! Port for user account storage and credential lookups.

use async_trait::async_trait;

use crate::domain::{Identity, Role};

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Directory connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user directory query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// An account already exists for the email address.
    #[error("an account already exists for {email}")]
    EmailTaken {
        /// Conflicting email address.
        email: String,
    },
}

impl UserDirectoryError {
    /// Build a [`UserDirectoryError::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`UserDirectoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a [`UserDirectoryError::EmailTaken`] error.
    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }
}

/// Fields of an account yet to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    /// Display name.
    pub name: String,
    /// Normalised email address, unique across the directory.
    pub email: String,
    /// Hex-encoded password digest.
    pub password_digest: String,
    /// Role the account holds.
    pub role: Role,
}

/// Stored account joined with its credential digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Identity fields used for authorisation.
    pub identity: Identity,
    /// Display name.
    pub name: String,
    /// Normalised email address.
    pub email: String,
    /// Hex-encoded password digest.
    pub password_digest: String,
}

/// Port for creating accounts and resolving identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Store a new account and return its identity.
    async fn create(&self, record: NewUserRecord) -> Result<Identity, UserDirectoryError>;

    /// Resolve the identity behind a user id.
    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, UserDirectoryError>;

    /// Find an account by its normalised email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserDirectoryError>;
}

/// In-memory fixture used by tests and fixture-backed servers.
#[derive(Debug, Default)]
pub struct FixtureUserDirectory {
    users: std::sync::Mutex<Vec<StoredUser>>,
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn create(&self, record: NewUserRecord) -> Result<Identity, UserDirectoryError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| UserDirectoryError::query("fixture lock poisoned"))?;
        if users.iter().any(|user| user.email == record.email) {
            return Err(UserDirectoryError::email_taken(record.email));
        }
        let id = i64::try_from(users.len())
            .map_err(|_| UserDirectoryError::query("fixture id overflow"))?
            + 1;
        let identity = Identity::new(id, record.role);
        users.push(StoredUser {
            identity,
            name: record.name,
            email: record.email,
            password_digest: record.password_digest,
        });
        Ok(identity)
    }

    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, UserDirectoryError> {
        let users = self
            .users
            .lock()
            .map_err(|_| UserDirectoryError::query("fixture lock poisoned"))?;
        Ok(users
            .iter()
            .find(|user| user.identity.id == id)
            .map(|user| user.identity))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserDirectoryError> {
        let users = self
            .users
            .lock()
            .map_err(|_| UserDirectoryError::query("fixture lock poisoned"))?;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn record(email: &str, role: Role) -> NewUserRecord {
        NewUserRecord {
            name: "Alice".to_owned(),
            email: email.to_owned(),
            password_digest: "digest".to_owned(),
            role,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_rejects_duplicate_email() {
        let directory = FixtureUserDirectory::default();
        directory
            .create(record("alice@example.com", Role::Student))
            .await
            .expect("first create succeeds");
        let err = directory
            .create(record("alice@example.com", Role::Admin))
            .await
            .expect_err("duplicate email must fail");
        assert!(matches!(err, UserDirectoryError::EmailTaken { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_round_trip() {
        let directory = FixtureUserDirectory::default();
        let identity = directory
            .create(record("alice@example.com", Role::Student))
            .await
            .expect("create succeeds");

        let resolved = directory
            .find_identity(identity.id)
            .await
            .expect("lookup succeeds");
        assert_eq!(resolved, Some(identity));

        let stored = directory
            .find_by_email("alice@example.com")
            .await
            .expect("lookup succeeds")
            .expect("account exists");
        assert_eq!(stored.identity, identity);
    }
}
