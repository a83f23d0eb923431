use derive_new::new;

use crate::model::id::{EventId, UserId};

#[derive(new, Debug)]
pub struct CreateRegistration {
    pub user_id: UserId,
    pub event_id: EventId,
    pub certificate_url: String,
}

#[derive(new, Debug)]
pub struct DeleteRegistration {
    pub user_id: UserId,
    pub event_id: EventId,
}
