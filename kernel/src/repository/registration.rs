use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{EventId, RegistrationId, UserId},
    registration::{
        event::{CreateRegistration, DeleteRegistration},
        RegisteredEvent, Registration,
    },
};

/// Registration の書き込みはオーケストレーター（RegistrationService）のみが行う。
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    // 登録レコードを作成する。(user_id, event_id) の複合ユニーク制約に
    // 違反した場合は AlreadyRegistered を返す
    async fn create(&self, event: CreateRegistration) -> AppResult<RegistrationId>;
    // 登録レコードを削除し、存在した場合は削除した行を返す
    async fn delete(&self, event: DeleteRegistration) -> AppResult<Option<Registration>>;
    async fn exists(&self, user_id: UserId, event_id: EventId) -> AppResult<bool>;
    async fn count_by_event_id(&self, event_id: EventId) -> AppResult<i64>;
    // 参加者の登録済みイベント一覧を取得する
    async fn find_registered_events(&self, user_id: UserId) -> AppResult<Vec<RegisteredEvent>>;
}
