//! Driving ports for authentication, registration, and identity resolution.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoginCredentials, RegistrationRequest, Role};

/// Port for authenticating login credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the credentials and return the caller's identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;
}

/// Port for registering new accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Store a new account and return its identity.
    async fn register(&self, request: &RegistrationRequest) -> Result<Identity, Error>;
}

/// Port resolving a stored user id to a full identity.
///
/// Called once per authenticated request so role changes take effect on the
/// next request rather than at next login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the identity behind a user id, if the account still exists.
    async fn resolve(&self, user_id: i64) -> Result<Option<Identity>, Error>;
}

/// Fixture that accepts any credentials as a student.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<Identity, Error> {
        Ok(Identity::new(1, Role::Student))
    }
}

/// Fixture that registers any request as user 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationService;

#[async_trait]
impl RegistrationService for FixtureRegistrationService {
    async fn register(&self, request: &RegistrationRequest) -> Result<Identity, Error> {
        Ok(Identity::new(1, request.role()))
    }
}

/// Fixture that resolves every id as a student.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityResolver;

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve(&self, user_id: i64) -> Result<Option<Identity>, Error> {
        Ok(Some(Identity::new(user_id, Role::Student)))
    }
}
