//! PostgreSQL persistence adapters built on Diesel.

mod diesel_complaint_repository;
mod diesel_error_mapping;
mod diesel_user_directory;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
