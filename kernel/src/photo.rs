use async_trait::async_trait;

/// 参加者の写真をベストエフォートで取得する。失敗しても登録処理は続行される。
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}
