//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ComplaintCommand, ComplaintQuery, FixtureComplaintCommand, FixtureComplaintQuery,
    FixtureIdentityResolver, FixtureLoginService, FixtureRegistrationService, IdentityResolver,
    LoginService, RegistrationService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential verification.
    pub login: Arc<dyn LoginService>,
    /// Account creation.
    pub registration: Arc<dyn RegistrationService>,
    /// Per-request identity resolution from the session's user id.
    pub identities: Arc<dyn IdentityResolver>,
    /// Complaint mutations.
    pub complaints: Arc<dyn ComplaintCommand>,
    /// Complaint reads.
    pub complaints_query: Arc<dyn ComplaintQuery>,
}

impl HttpState {
    /// State wired entirely to fixtures, for tests and smoke servers.
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            registration: Arc::new(FixtureRegistrationService),
            identities: Arc::new(FixtureIdentityResolver),
            complaints: Arc::new(FixtureComplaintCommand),
            complaints_query: Arc::new(FixtureComplaintQuery),
        }
    }
}
