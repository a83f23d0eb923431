pub mod model;
pub mod photo;
pub mod repository;
pub mod service;
pub mod storage;
