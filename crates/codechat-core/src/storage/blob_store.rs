//! BlobStore trait definition.

use codechat_types::chat::AttachmentRef;
use codechat_types::error::BlobError;

/// Durable storage for attachment payloads.
///
/// `save` returns an [`AttachmentRef`] whose locator round-trips through
/// `load` to byte-identical content. Uses native async fn in traits
/// (RPITIT, Rust 2024 edition).
pub trait BlobStore: Send + Sync {
    /// Persist `data`, deriving the locator from `suggested_name`.
    fn save(
        &self,
        data: &[u8],
        suggested_name: &str,
    ) -> impl std::future::Future<Output = Result<AttachmentRef, BlobError>> + Send;

    /// Load the bytes behind a locator previously returned by `save`.
    fn load(
        &self,
        locator: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, BlobError>> + Send;

    /// Remove the bytes behind a locator.
    fn delete(
        &self,
        locator: &str,
    ) -> impl std::future::Future<Output = Result<(), BlobError>> + Send;
}
