//! Local filesystem blob store implementation.
//!
//! Implements the `BlobStore` trait from `codechat-core` with one flat
//! directory of payload files. Locators are uuid-prefixed filenames, so two
//! attachments with the same suggested name never collide.

use std::path::PathBuf;

use codechat_core::storage::blob_store::BlobStore;
use codechat_types::chat::AttachmentRef;
use codechat_types::error::BlobError;
use uuid::Uuid;

/// Maximum accepted attachment payload (50 MB).
pub const MAX_BLOB_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Filesystem-backed blob store rooted at a single directory.
pub struct LocalBlobStore {
    base_dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at `base_dir`. The directory is created
    /// lazily on first save.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn blob_path(&self, locator: &str) -> PathBuf {
        self.base_dir.join(locator)
    }

    /// Reject names that could escape the base directory.
    fn validate_name(name: &str) -> Result<(), BlobError> {
        if name.is_empty() {
            return Err(BlobError::InvalidName("empty name".to_string()));
        }
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(BlobError::InvalidName(format!(
                "'{name}' must not contain path separators or '..'"
            )));
        }
        Ok(())
    }
}

impl BlobStore for LocalBlobStore {
    async fn save(&self, data: &[u8], suggested_name: &str) -> Result<AttachmentRef, BlobError> {
        Self::validate_name(suggested_name)?;

        if data.len() as u64 > MAX_BLOB_SIZE_BYTES {
            return Err(BlobError::TooLarge {
                limit: MAX_BLOB_SIZE_BYTES,
                actual: data.len() as u64,
            });
        }

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| BlobError::Io(format!("failed to create blob dir: {e}")))?;

        let locator = format!("{}_{}", Uuid::now_v7().simple(), suggested_name);
        tokio::fs::write(self.blob_path(&locator), data)
            .await
            .map_err(|e| BlobError::Io(format!("failed to write blob: {e}")))?;

        Ok(AttachmentRef {
            locator,
            display_name: Some(suggested_name.to_string()),
        })
    }

    async fn load(&self, locator: &str) -> Result<Vec<u8>, BlobError> {
        Self::validate_name(locator)?;

        match tokio::fs::read(self.blob_path(locator)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(locator.to_string()))
            }
            Err(e) => Err(BlobError::Io(format!("failed to read blob: {e}"))),
        }
    }

    async fn delete(&self, locator: &str) -> Result<(), BlobError> {
        Self::validate_name(locator)?;

        match tokio::fs::remove_file(self.blob_path(locator)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(locator.to_string()))
            }
            Err(e) => Err(BlobError::Io(format!("failed to remove blob: {e}"))),
        }
    }
}
