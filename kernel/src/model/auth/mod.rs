/// Authorization ヘッダーで受け取るアクセストークン。
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn redis_key(&self) -> String {
        format!("token:{}", self.0)
    }
}
