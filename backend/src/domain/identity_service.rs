//! Identity service: registration, login, and per-request resolution.
//!
//! Login failures deliberately reuse one message for unknown emails and
//! wrong passwords so responses do not reveal which accounts exist.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    IdentityResolver, LoginService, NewUserRecord, RegistrationService, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{Error, Identity, LoginCredentials, PasswordDigest, RegistrationRequest};

const BAD_CREDENTIALS: &str = "invalid email or password";

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::storage_failure(format!("user directory error: {message}"))
        }
        UserDirectoryError::EmailTaken { email } => {
            Error::invalid_request(format!("an account already exists for {email}"))
                .with_details(json!({ "code": "email_taken" }))
        }
    }
}

/// Identity service over a user directory.
#[derive(Clone)]
pub struct IdentityService<D> {
    directory: Arc<D>,
}

impl<D> IdentityService<D> {
    /// Create a new service over the user directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> RegistrationService for IdentityService<D>
where
    D: UserDirectory,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<Identity, Error> {
        let digest = PasswordDigest::compute(request.password());
        self.directory
            .create(NewUserRecord {
                name: request.name().to_owned(),
                email: request.email().to_owned(),
                password_digest: digest.as_ref().to_owned(),
                role: request.role(),
            })
            .await
            .map_err(map_directory_error)
    }
}

#[async_trait]
impl<D> LoginService for IdentityService<D>
where
    D: UserDirectory,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        let stored = self
            .directory
            .find_by_email(credentials.email())
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::unauthorized(BAD_CREDENTIALS))?;

        let digest = PasswordDigest::from_stored(stored.password_digest);
        if !digest.matches(credentials.password()) {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }
        Ok(stored.identity)
    }
}

#[async_trait]
impl<D> IdentityResolver for IdentityService<D>
where
    D: UserDirectory,
{
    async fn resolve(&self, user_id: i64) -> Result<Option<Identity>, Error> {
        self.directory
            .find_identity(user_id)
            .await
            .map_err(map_directory_error)
    }
}
