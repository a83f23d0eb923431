use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{auth::AccessToken, id::UserId};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // アクセストークンから参加者 ID を引く
    async fn fetch_participant_id(&self, access_token: &AccessToken)
        -> AppResult<Option<UserId>>;
}
