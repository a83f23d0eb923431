use kernel::model::{
    event::{Event, EventSummary},
    id::EventId,
};
use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            event_id,
            title,
            date,
            location,
            capacity,
            image_url,
            description,
        } = value;
        Event {
            event_id,
            title,
            date,
            location,
            capacity,
            image_url,
            description,
        }
    }
}

// 一覧表示用。total はページネーションのためのウィンドウ集計
#[derive(sqlx::FromRow)]
pub struct EventSummaryRow {
    pub total: i64,
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered: i64,
    pub remaining: i64,
    pub image_url: Option<String>,
}

impl From<EventSummaryRow> for EventSummary {
    fn from(value: EventSummaryRow) -> Self {
        let EventSummaryRow {
            total: _,
            event_id,
            title,
            date,
            location,
            capacity,
            registered,
            remaining,
            image_url,
        } = value;
        EventSummary {
            event_id,
            title,
            date,
            location,
            capacity,
            registered,
            remaining,
            image_url,
        }
    }
}
