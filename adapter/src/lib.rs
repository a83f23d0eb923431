pub mod database;
pub mod photo;
pub mod redis;
pub mod repository;
pub mod storage;
