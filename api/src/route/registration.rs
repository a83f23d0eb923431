use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::registration::show_my_registrations;

pub fn build_registration_routers() -> Router<AppRegistry> {
    Router::new().route("/registrations/me", get(show_my_registrations))
}
