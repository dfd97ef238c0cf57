//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod complaints;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
