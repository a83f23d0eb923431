use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    event::{Event, EventListOptions, PaginatedEventList},
    id::EventId,
};

/// イベントは管理側のサブシステムが所有するため、登録コアからは読み取り専用。
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    // 残席数込みの一覧を検索条件つきで取得する
    async fn find_all(&self, options: EventListOptions) -> AppResult<PaginatedEventList>;
}
