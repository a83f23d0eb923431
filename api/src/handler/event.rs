use axum::{
    extract::{Path, Query, State},
    Json,
};
use garde::Validate;
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::event::{EventListQuery, EventResponse, PaginatedEventsResponse};

pub async fn show_event_list(
    Query(query): Query<EventListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedEventsResponse>> {
    query.validate(&())?;

    registry
        .event_repository()
        .find_all(query.into())
        .await
        .map(PaginatedEventsResponse::from)
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    let event = registry
        .event_repository()
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("イベントが見つかりませんでした。".into()))?;

    let registered = registry
        .registration_repository()
        .count_by_event_id(event_id)
        .await?;

    Ok(Json(EventResponse::new(event, registered)))
}
