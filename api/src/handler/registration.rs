use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedParticipant,
    model::registration::{CertificateResponse, RegisteredEventsResponse},
};

pub async fn register_for_event(
    user: AuthorizedParticipant,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<impl IntoResponse> {
    let certificate_url = registry
        .registration_service()
        .register(user.id(), event_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CertificateResponse { certificate_url }),
    ))
}

pub async fn cancel_registration(
    user: AuthorizedParticipant,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .registration_service()
        .cancel(user.id(), event_id)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_my_registrations(
    user: AuthorizedParticipant,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegisteredEventsResponse>> {
    registry
        .registration_repository()
        .find_registered_events(user.id())
        .await
        .map(RegisteredEventsResponse::from)
        .map(Json)
}
