//! Filesystem-backed `AttachmentStore` using capability-scoped directory access.
//!
//! The store holds an open handle to the upload directory and resolves every
//! name relative to it, so a crafted reference cannot escape the directory.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

/// Attachment store writing binaries into a single directory.
pub struct FsAttachmentStore {
    dir: Dir,
}

impl FsAttachmentStore {
    /// Open the store rooted at `path`, creating the directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AttachmentStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| AttachmentStoreError::write(format!("create {}: {err}", path.display())))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| AttachmentStoreError::write(format!("open {}: {err}", path.display())))?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn save(&self, bytes: &[u8], name: &str) -> Result<String, AttachmentStoreError> {
        self.dir
            .write(name, bytes)
            .map_err(|err| AttachmentStoreError::write(format!("write {name}: {err}")))?;
        Ok(name.to_owned())
    }

    async fn delete(&self, name: &str) -> Result<(), AttachmentStoreError> {
        match self.dir.remove_file(name) {
            Ok(()) => Ok(()),
            // Deleting an absent name is a no-op so failure-path cleanup
            // never compounds the original error.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AttachmentStoreError::delete(format!("remove {name}: {err}"))),
        }
    }
}
