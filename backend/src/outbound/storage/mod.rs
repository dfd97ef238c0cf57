//! Binary storage adapters.

mod fs_attachment_store;

pub use fs_attachment_store::FsAttachmentStore;
