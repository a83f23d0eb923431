use chrono::{DateTime, Utc};

use crate::model::id::{EventId, RegistrationId, UserId};

pub mod event;

#[derive(Debug, Clone)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub registered_at: DateTime<Utc>,
    pub certificate_url: Option<String>,
}

/// 参加者自身の登録済みイベント一覧の 1 行分。
#[derive(Debug)]
pub struct RegisteredEvent {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub certificate_url: Option<String>,
}
