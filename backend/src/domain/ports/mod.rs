//! Domain ports and supporting types for the hexagonal boundary.

mod attachment_store;
mod complaint_command;
mod complaint_query;
mod complaint_repository;
mod identity_access;
mod user_directory;

#[cfg(test)]
pub use attachment_store::MockAttachmentStore;
pub use attachment_store::{AttachmentStore, AttachmentStoreError, FixtureAttachmentStore};
#[cfg(test)]
pub use complaint_command::MockComplaintCommand;
pub use complaint_command::{ComplaintCommand, CreateComplaintRequest, FixtureComplaintCommand};
#[cfg(test)]
pub use complaint_query::MockComplaintQuery;
pub use complaint_query::{ComplaintListFilter, ComplaintQuery, FixtureComplaintQuery};
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{
    ComplaintRepository, ComplaintRepositoryError, FixtureComplaintRepository, NewComplaintRecord,
};
#[cfg(test)]
pub use identity_access::{MockIdentityResolver, MockLoginService, MockRegistrationService};
pub use identity_access::{
    FixtureIdentityResolver, FixtureLoginService, FixtureRegistrationService, IdentityResolver,
    LoginService, RegistrationService,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{
    FixtureUserDirectory, NewUserRecord, StoredUser, UserDirectory, UserDirectoryError,
};
