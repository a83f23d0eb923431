use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{Event, EventListOptions, EventSummary, PaginatedEventList},
    id::EventId,
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::event::{EventRow, EventSummaryRow},
    ConnectionPool,
};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, title, date, location, capacity, image_url, description
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Event::from))
    }

    // 残席数は保存せず、登録数との差分をその場で計算する
    async fn find_all(&self, options: EventListOptions) -> AppResult<PaginatedEventList> {
        let EventListOptions {
            title,
            location,
            date_from,
            limit,
            offset,
        } = options;

        let rows: Vec<EventSummaryRow> = sqlx::query_as(
            r#"
                SELECT
                    COUNT(*) OVER() AS total,
                    e.event_id,
                    e.title,
                    e.date,
                    e.location,
                    e.capacity,
                    COUNT(r.registration_id) AS registered,
                    GREATEST(e.capacity - COUNT(r.registration_id), 0) AS remaining,
                    e.image_url
                FROM events AS e
                LEFT JOIN registrations AS r USING (event_id)
                WHERE ($1::text IS NULL OR e.title ILIKE '%' || $1 || '%')
                  AND ($2::text IS NULL OR e.location ILIKE '%' || $2 || '%')
                  AND ($3::timestamptz IS NULL OR e.date >= $3)
                GROUP BY e.event_id
                ORDER BY e.date ASC
                LIMIT $4
                OFFSET $5
            "#,
        )
        .bind(title)
        .bind(location)
        .bind(date_from)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let total = rows.first().map(|r| r.total).unwrap_or(0);
        let items = rows.into_iter().map(EventSummary::from).collect();

        Ok(PaginatedEventList {
            total,
            limit,
            offset,
            items,
        })
    }
}
