use std::time::Duration;

use async_trait::async_trait;
use kernel::photo::PhotoFetcher;
use reqwest::Client;

/// 参加者の写真を外部 URL から取得する。タイムアウトは有限で、
/// 失敗はオーケストレーター側で警告ログに落とされる。
pub struct HttpPhotoFetcher {
    http: Client,
}

impl HttpPhotoFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PhotoFetcher for HttpPhotoFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
