use std::time::Duration;

use async_trait::async_trait;
use kernel::storage::{CertificateStore, StoreError};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};
use shared::config::StorageConfig;

/// Google Cloud Storage の JSON API を使った CertificateStore 実装。
///
/// `predefinedAcl=publicRead` でアップロードするため、オブジェクトは
/// 公開 URL からそのまま参照できる。全リクエストに有限のタイムアウトを課し、
/// 期限超過は StoreUnavailable として失敗させる。
pub struct CloudStorageClient {
    http: Client,
    bucket: String,
    api_base: Url,
    public_base: String,
    access_token: String,
}

impl CloudStorageClient {
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            bucket: config.bucket.clone(),
            api_base: Url::parse(&config.api_base)?,
            public_base: config.public_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn upload_url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Rejected("storage endpoint cannot be a base".into()))?
            .extend(["upload", "storage", "v1", "b", self.bucket.as_str(), "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path)
            .append_pair("predefinedAcl", "publicRead");
        Ok(url)
    }

    fn object_url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.api_base.clone();
        // オブジェクト名はパスセグメントとして百分率符号化される
        url.path_segments_mut()
            .map_err(|_| StoreError::Rejected("storage endpoint cannot be a base".into()))?
            .extend(["storage", "v1", "b", self.bucket.as_str(), "o", path]);
        Ok(url)
    }
}

#[async_trait]
impl CertificateStore for CloudStorageClient {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = self.upload_url(path)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(self.public_url(path))
        } else if status.is_client_error() {
            Err(StoreError::Rejected(describe(response).await))
        } else {
            Err(StoreError::Unavailable(describe(response).await))
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = self.object_url(path)?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(StoreError::NotFound(path.to_string()))
        } else if status.is_client_error() {
            Err(StoreError::Rejected(describe(response).await))
        } else {
            Err(StoreError::Unavailable(describe(response).await))
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.public_base, self.bucket, path)
    }
}

// 接続・タイムアウト系の失敗はリトライ可能な Unavailable に倒す
fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn describe(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{status}: {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CloudStorageClient {
        CloudStorageClient::new(&StorageConfig {
            bucket: "event-horizon".into(),
            api_base: "https://storage.googleapis.com".into(),
            public_base: "https://storage.googleapis.com".into(),
            access_token: "test-token".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn public_url_points_at_the_bucket_object() {
        assert_eq!(
            client().public_url("certificates/a-b.pdf"),
            "https://storage.googleapis.com/event-horizon/certificates/a-b.pdf"
        );
    }

    #[test]
    fn upload_url_requests_public_media_upload() {
        let url = client().upload_url("certificates/a-b.pdf").unwrap();
        let url = url.as_str();
        assert!(url.starts_with("https://storage.googleapis.com/upload/storage/v1/b/event-horizon/o?"));
        assert!(url.contains("uploadType=media"));
        assert!(url.contains("name=certificates%2Fa-b.pdf"));
        assert!(url.contains("predefinedAcl=publicRead"));
    }

    #[test]
    fn object_url_encodes_the_object_name() {
        let url = client().object_url("certificates/a-b.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/event-horizon/o/certificates%2Fa-b.pdf"
        );
    }
}
