//! Port for attachment binary storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

/// Errors raised by attachment store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentStoreError {
    /// The binary could not be written.
    #[error("attachment write failed: {message}")]
    Write {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The binary could not be removed.
    #[error("attachment delete failed: {message}")]
    Delete {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl AttachmentStoreError {
    /// Build an [`AttachmentStoreError::Write`] error.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Build an [`AttachmentStoreError::Delete`] error.
    pub fn delete(message: impl Into<String>) -> Self {
        Self::Delete {
            message: message.into(),
        }
    }
}

/// Port for staging and deleting attachment binaries.
///
/// `delete` is idempotent: removing a name that does not exist succeeds, so
/// failure-path cleanup never compounds the original error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist the bytes under `name` and return the stored reference.
    async fn save(&self, bytes: &[u8], name: &str) -> Result<String, AttachmentStoreError>;

    /// Remove the binary stored under `name`, if any.
    async fn delete(&self, name: &str) -> Result<(), AttachmentStoreError>;
}

/// In-memory fixture used by tests and fixture-backed servers.
#[derive(Debug, Default)]
pub struct FixtureAttachmentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl FixtureAttachmentStore {
    /// Whether a binary is currently stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.blobs
            .lock()
            .map(|blobs| blobs.contains_key(name))
            .unwrap_or(false)
    }

    /// Number of stored binaries.
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    /// Whether the store holds no binaries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttachmentStore for FixtureAttachmentStore {
    async fn save(&self, bytes: &[u8], name: &str) -> Result<String, AttachmentStoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AttachmentStoreError::write("fixture lock poisoned"))?;
        blobs.insert(name.to_owned(), bytes.to_vec());
        Ok(name.to_owned())
    }

    async fn delete(&self, name: &str) -> Result<(), AttachmentStoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AttachmentStoreError::delete("fixture lock poisoned"))?;
        blobs.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_save_then_delete_round_trips() {
        let store = FixtureAttachmentStore::default();
        let name = store
            .save(b"bytes", "1-abc.png")
            .await
            .expect("save succeeds");
        assert!(store.contains(&name));

        store.delete(&name).await.expect("delete succeeds");
        assert!(store.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_delete_is_idempotent() {
        let store = FixtureAttachmentStore::default();
        store
            .delete("never-stored.png")
            .await
            .expect("deleting an absent name succeeds");
    }
}
