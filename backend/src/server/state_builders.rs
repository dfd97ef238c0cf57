//! Builders selecting database-backed or fixture ports for the HTTP state.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{FixtureAttachmentStore, FixtureComplaintRepository, FixtureUserDirectory};
use crate::domain::{ComplaintService, IdentityService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DieselComplaintRepository, DieselUserDirectory};
use crate::outbound::storage::FsAttachmentStore;

use super::ServerConfig;

/// Build the shared HTTP state from the configured adapters.
///
/// With a pool the identity and complaint services run over the Diesel
/// adapters and a filesystem attachment store rooted at the configured
/// directory. Without one, everything runs over in-memory fixtures.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => {
            let store = FsAttachmentStore::open(&config.attachment_dir).map_err(|err| {
                std::io::Error::other(format!("attachment store unavailable: {err}"))
            })?;
            let identity = Arc::new(IdentityService::new(Arc::new(DieselUserDirectory::new(
                pool.clone(),
            ))));
            let complaints = Arc::new(ComplaintService::new(
                Arc::new(DieselComplaintRepository::new(pool.clone())),
                Arc::new(store),
            ));
            HttpState {
                login: identity.clone(),
                registration: identity.clone(),
                identities: identity,
                complaints: complaints.clone(),
                complaints_query: complaints,
            }
        }
        None => {
            let identity = Arc::new(IdentityService::new(
                Arc::new(FixtureUserDirectory::default()),
            ));
            let complaints = Arc::new(ComplaintService::new(
                Arc::new(FixtureComplaintRepository::default()),
                Arc::new(FixtureAttachmentStore::default()),
            ));
            HttpState {
                login: identity.clone(),
                registration: identity.clone(),
                identities: identity,
                complaints: complaints.clone(),
                complaints_query: complaints,
            }
        }
    };
    Ok(web::Data::new(state))
}
