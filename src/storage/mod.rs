use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object store operation failed: {0}")]
    Backend(String),
}

/// Binary object storage seam. Services depend on this trait so the S3
/// client can be swapped for the in-memory store in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store content at the given key, overwriting any existing object.
    async fn put(&self, key: &str, content: &[u8], content_type: &str)
        -> Result<(), StorageError>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete the object at the given key. Deleting a missing key is not an
    /// error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Client-facing URL for a stored object.
pub fn object_url(key: &str) -> String {
    let base = &crate::config::config().storage.public_base_url;
    if base.ends_with('/') {
        format!("{}{}", base, key)
    } else {
        format!("{}/{}", base, key)
    }
}
