use chrono::{DateTime, Utc};

use crate::model::id::EventId;

#[derive(Debug, Clone)]
pub struct Event {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl Event {
    // 受付はイベント開始時刻で締め切る
    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }
}

/// 一覧表示用のイベント情報。残席数は保存せず都度計算する。
#[derive(Debug)]
pub struct EventSummary {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered: i64,
    pub remaining: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct EventListOptions {
    pub title: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug)]
pub struct PaginatedEventList {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<EventSummary>,
}
