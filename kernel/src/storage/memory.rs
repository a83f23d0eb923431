use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CertificateStore, StoreError};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// テストやローカル実行用のインメモリ実装。
#[derive(Debug, Default, Clone)]
pub struct MemoryCertificateStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.lock().await.contains_key(path)
    }

    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl CertificateStore for MemoryCertificateStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        self.objects.lock().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.objects
            .lock()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_delete_round_trip() {
        let store = MemoryCertificateStore::new();

        let url = store
            .upload("certificates/a-b.pdf", b"%PDF".to_vec(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(url, "memory://certificates/a-b.pdf");
        assert!(store.contains("certificates/a-b.pdf").await);

        store.delete("certificates/a-b.pdf").await.unwrap();
        assert!(!store.contains("certificates/a-b.pdf").await);
    }

    #[tokio::test]
    async fn delete_of_missing_object_is_not_found() {
        let store = MemoryCertificateStore::new();
        let err = store.delete("certificates/none.pdf").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
