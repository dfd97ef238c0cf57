//! Domain model and services for the complaint desk.
//!
//! Everything in this module is transport and storage agnostic; adapters on
//! either side of the hexagon depend on it, never the other way round.

pub mod attachment;
mod auth;
mod complaint;
mod complaint_service;
mod error;
mod identity;
mod identity_service;
pub mod policy;
pub mod ports;

pub use attachment::{ATTACHMENT_MAX_BYTES, AttachmentUpload, ValidatedAttachment};
pub use auth::{
    CredentialValidationError, LoginCredentials, NAME_MIN, PASSWORD_MIN, PasswordDigest,
    RegistrationRequest, RegistrationValidationError,
};
pub use complaint::{
    Category, CategoryParseError, Complaint, ComplaintFilter, ComplaintWithOwner, DESCRIPTION_MAX,
    DESCRIPTION_MIN, Description, DescriptionLengthError, Priority, PriorityParseError, Status,
    StatusParseError,
};
pub use complaint_service::ComplaintService;
pub use error::{Error, ErrorCode};
pub use identity::{Identity, OwnerSummary, Role, RoleParseError};
pub use identity_service::IdentityService;
pub use policy::{ComplaintAction, authorize, required_role};
