use async_trait::async_trait;
use shared::error::AppError;
use thiserror::Error;

use crate::model::id::{EventId, UserId};

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(path) => AppError::EntityNotFound(path),
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
            StoreError::Rejected(reason) => AppError::StoreWriteRejected(reason),
        }
    }
}

/// 証明書 PDF を置く耐久オブジェクトストア。
/// アップロードされたオブジェクトは公開 URL で読み取れることが契約。
#[async_trait]
pub trait CertificateStore: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
    fn public_url(&self, path: &str) -> String;
}

/// (参加者, イベント) から決まる証明書の保存先パス。
/// キャンセル時の削除も同じパスを再計算して行う。
pub fn certificate_object_path(user_id: UserId, event_id: EventId) -> String {
    format!("certificates/{user_id}-{event_id}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_is_keyed_by_the_pair() {
        let user_id = UserId::new();
        let event_id = EventId::new();

        let path = certificate_object_path(user_id, event_id);
        assert_eq!(path, format!("certificates/{user_id}-{event_id}.pdf"));
        // 再計算しても同じパスになる
        assert_eq!(path, certificate_object_path(user_id, event_id));
    }
}
