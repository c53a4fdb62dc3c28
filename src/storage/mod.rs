// Object storage boundary (S3-compatible)

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;

use crate::types::StorageError;

pub mod memory;
pub mod s3_client;

pub use memory::InMemoryStore;
pub use s3_client::S3Store;

/// Key/value access to a single bucket, keyed by file name.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, content: Bytes) -> Result<(), StorageError>;

    /// Writes the object into `file` and returns the number of bytes written.
    async fn download_to_file(&self, key: &str, file: &mut File) -> Result<u64, StorageError>;
}
