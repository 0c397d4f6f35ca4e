use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ObjectStore, StorageError};

/// In-memory object store used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .lock()
            .expect("store lock")
            .insert(key.to_string(), content.to_vec());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.lock().expect("store lock").contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().expect("store lock").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_exists_delete() {
        let store = MemoryStore::new();
        assert!(!store.exists("designs/a.jpg").await.unwrap());

        store.put("designs/a.jpg", b"bytes", "image/jpeg").await.unwrap();
        assert!(store.exists("designs/a.jpg").await.unwrap());

        store.delete("designs/a.jpg").await.unwrap();
        assert!(!store.exists("designs/a.jpg").await.unwrap());

        // Deleting a missing key is fine
        store.delete("designs/a.jpg").await.unwrap();
    }
}
