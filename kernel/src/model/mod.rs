pub mod auth;
pub mod event;
pub mod id;
pub mod registration;
pub mod user;
