use std::sync::Arc;
use std::time::Duration;

use adapter::database::ConnectionPool;
use adapter::photo::HttpPhotoFetcher;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::registration::RegistrationRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use adapter::storage::CloudStorageClient;
use kernel::repository::auth::AuthRepository;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::registration::RegistrationRepository;
use kernel::repository::user::UserRepository;
use kernel::service::registration::RegistrationService;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    event_repository: Arc<dyn EventRepository>,
    user_repository: Arc<dyn UserRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    registration_service: Arc<RegistrationService>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: AppConfig,
    ) -> anyhow::Result<Self> {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let registration_repository = Arc::new(RegistrationRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(redis_client.clone()));

        let certificate_store = Arc::new(CloudStorageClient::new(&app_config.storage)?);
        let photo_fetcher = Arc::new(HttpPhotoFetcher::new(Duration::from_secs(
            app_config.storage.timeout_secs,
        ))?);
        let registration_service = Arc::new(RegistrationService::new(
            event_repository.clone(),
            user_repository.clone(),
            registration_repository.clone(),
            certificate_store,
            photo_fetcher,
        ));

        Ok(Self {
            health_check_repository,
            event_repository,
            user_repository,
            registration_repository,
            auth_repository,
            registration_service,
        })
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn registration_repository(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn registration_service(&self) -> Arc<RegistrationService> {
        self.registration_service.clone()
    }
}
