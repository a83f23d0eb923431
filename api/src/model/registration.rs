use chrono::{DateTime, Utc};
use kernel::model::{id::EventId, registration::RegisteredEvent};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub certificate_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEventsResponse {
    pub items: Vec<RegisteredEventResponse>,
}

impl From<Vec<RegisteredEvent>> for RegisteredEventsResponse {
    fn from(value: Vec<RegisteredEvent>) -> Self {
        Self {
            items: value
                .into_iter()
                .map(RegisteredEventResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEventResponse {
    pub event_id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub certificate_url: Option<String>,
}

impl From<RegisteredEvent> for RegisteredEventResponse {
    fn from(value: RegisteredEvent) -> Self {
        let RegisteredEvent {
            event_id,
            title,
            date,
            location,
            image_url,
            registered_at,
            certificate_url,
        } = value;
        Self {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::model::id::EventId;

    #[test]
    fn registered_event_serializes_camel_case() {
        let res = RegisteredEventResponse::from(RegisteredEvent {
            event_id: EventId::new(),
            title: "Tech Expo".into(),
            date: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
            location: "Osaka".into(),
            image_url: None,
            registered_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
            certificate_url: Some("https://example.com/cert.pdf".into()),
        });
        let json = serde_json::to_value(&res).unwrap();
        assert!(json.get("certificateUrl").is_some());
        assert!(json.get("registeredAt").is_some());
        assert!(json.get("certificate_url").is_none());
    }
}
