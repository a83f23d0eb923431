use kernel::model::{
    id::{EventId, RegistrationId, UserId},
    registration::{RegisteredEvent, Registration},
};
use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: RegistrationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub registered_at: DateTime<Utc>,
    pub certificate_url: Option<String>,
}

impl From<RegistrationRow> for Registration {
    fn from(value: RegistrationRow) -> Self {
        let RegistrationRow {
            registration_id,
            user_id,
            event_id,
            registered_at,
            certificate_url,
        } = value;
        Registration {
            registration_id,
            user_id,
            event_id,
            registered_at,
            certificate_url,
        }
    }
}

// 参加者の登録済みイベント一覧に使う型
#[derive(sqlx::FromRow)]
pub struct RegisteredEventRow {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub certificate_url: Option<String>,
}

impl From<RegisteredEventRow> for RegisteredEvent {
    fn from(value: RegisteredEventRow) -> Self {
        let RegisteredEventRow {
            event_id,
            title,
            date,
            location,
            image_url,
            registered_at,
            certificate_url,
        } = value;
        RegisteredEvent {
            event_id,
            title,
            date,
            location,
            image_url,
            registered_at,
            certificate_url,
        }
    }
}
