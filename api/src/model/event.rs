use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    event::{Event, EventListOptions, EventSummary, PaginatedEventList},
    id::EventId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[garde(skip)]
    pub title: Option<String>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub date_from: Option<DateTime<Utc>>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl From<EventListQuery> for EventListOptions {
    fn from(value: EventListQuery) -> Self {
        let EventListQuery {
            title,
            location,
            date_from,
            limit,
            offset,
        } = value;
        Self {
            title,
            location,
            date_from,
            limit,
            offset,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedEventsResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<EventSummaryResponse>,
}

impl From<PaginatedEventList> for PaginatedEventsResponse {
    fn from(value: PaginatedEventList) -> Self {
        let PaginatedEventList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(EventSummaryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryResponse {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered: i64,
    pub remaining_capacity: i64,
    pub image_url: Option<String>,
}

impl From<EventSummary> for EventSummaryResponse {
    fn from(value: EventSummary) -> Self {
        let EventSummary {
            event_id,
            title,
            date,
            location,
            capacity,
            registered,
            remaining,
            image_url,
        } = value;
        Self {
            event_id,
            title,
            date,
            location,
            capacity,
            registered,
            remaining_capacity: remaining,
            image_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered: i64,
    pub remaining_capacity: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl EventResponse {
    pub fn new(event: Event, registered: i64) -> Self {
        let Event {
            event_id,
            title,
            date,
            location,
            capacity,
            image_url,
            description,
        } = event;
        Self {
            event_id,
            title,
            date,
            location,
            capacity,
            registered,
            remaining_capacity: (capacity as i64 - registered).max(0),
            image_url,
            description,
        }
    }
}
