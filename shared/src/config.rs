use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "5432".into())
                .parse()?,
            username: env::var("DATABASE_USERNAME").unwrap_or_else(|_| "app".into()),
            password: env::var("DATABASE_PASSWORD").unwrap_or_else(|_| "passwd".into()),
            database: env::var("DATABASE_NAME").unwrap_or_else(|_| "app".into()),
        };
        let redis = RedisConfig {
            host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env::var("REDIS_PORT")
                .unwrap_or_else(|_| "6379".into())
                .parse()?,
        };
        let storage = StorageConfig {
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "event-horizon".into()),
            api_base: env::var("STORAGE_API_BASE")
                .unwrap_or_else(|_| "https://storage.googleapis.com".into()),
            public_base: env::var("STORAGE_PUBLIC_BASE")
                .unwrap_or_else(|_| "https://storage.googleapis.com".into()),
            access_token: env::var("STORAGE_ACCESS_TOKEN").unwrap_or_default(),
            timeout_secs: env::var("STORAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()?,
        };
        Ok(Self {
            database,
            redis,
            storage,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

/// 証明書 PDF を保存するオブジェクトストレージの設定。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub api_base: String,
    pub public_base: String,
    pub access_token: String,
    pub timeout_secs: u64,
}
