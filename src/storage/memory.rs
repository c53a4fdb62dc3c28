//! In-memory object store.
//!
//! Objects live in a map for the lifetime of the process. Used by the tests
//! and by `serve --in-memory` for running the relay without a bucket.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::ObjectStore;
use crate::types::StorageError;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_object(&self, key: &str, content: Bytes) -> Result<(), StorageError> {
        self.objects.write().await.insert(key.to_string(), content);
        Ok(())
    }

    async fn download_to_file(&self, key: &str, file: &mut File) -> Result<u64, StorageError> {
        let content = self
            .get(key)
            .await
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        file.write_all(&content).await?;
        file.flush().await?;
        Ok(content.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_then_download() {
        let temp_dir = TempDir::new().unwrap();
        let store = InMemoryStore::new();
        store
            .put_object("notes.txt", Bytes::from_static(b"field notes"))
            .await
            .unwrap();

        let path = temp_dir.path().join("notes.txt");
        let mut file = File::create(&path).await.unwrap();
        let written = store.download_to_file("notes.txt", &mut file).await.unwrap();
        file.flush().await.unwrap();

        assert_eq!(written, 11);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"field notes");
    }

    #[tokio::test]
    async fn test_missing_object() {
        let temp_dir = TempDir::new().unwrap();
        let store = InMemoryStore::new();
        let mut file = File::create(temp_dir.path().join("absent")).await.unwrap();

        let err = store.download_to_file("absent", &mut file).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(key) if key == "absent"));
    }
}
