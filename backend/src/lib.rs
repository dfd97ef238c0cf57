//! Campus complaint desk backend.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities, ports,
//! and services; `inbound` adapts them to HTTP; `outbound` adapts PostgreSQL
//! persistence and filesystem attachment storage; `server` wires everything
//! into an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware applied to the whole HTTP surface.
pub use middleware::Trace;
