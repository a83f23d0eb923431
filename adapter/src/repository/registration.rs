use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{EventId, RegistrationId, UserId},
    registration::{
        event::{CreateRegistration, DeleteRegistration},
        RegisteredEvent, Registration,
    },
};
use kernel::repository::registration::RegistrationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::registration::{RegisteredEventRow, RegistrationRow},
    ConnectionPool,
};

#[derive(new)]
pub struct RegistrationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RegistrationRepository for RegistrationRepositoryImpl {
    async fn create(&self, event: CreateRegistration) -> AppResult<RegistrationId> {
        let registration_id = RegistrationId::new();

        // (user_id, event_id) の複合ユニーク制約が並行リクエストに対する
        // 唯一の信頼できる防壁。違反は AlreadyRegistered として呼び出し側へ返す
        let result = sqlx::query(
            r#"
                INSERT INTO registrations (registration_id, user_id, event_id, certificate_url)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(registration_id)
        .bind(event.user_id)
        .bind(event.event_id)
        .bind(&event.certificate_url)
        .execute(self.db.inner_ref())
        .await;

        match result {
            Ok(_) => Ok(registration_id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::AlreadyRegistered)
            }
            Err(e) => Err(AppError::SpecificOperationError(e)),
        }
    }

    async fn delete(&self, event: DeleteRegistration) -> AppResult<Option<Registration>> {
        let row: Option<RegistrationRow> = sqlx::query_as(
            r#"
                DELETE FROM registrations
                WHERE user_id = $1 AND event_id = $2
                RETURNING registration_id, user_id, event_id, registered_at, certificate_url
            "#,
        )
        .bind(event.user_id)
        .bind(event.event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Registration::from))
    }

    async fn exists(&self, user_id: UserId, event_id: EventId) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM registrations
                    WHERE user_id = $1 AND event_id = $2
                )
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn count_by_event_id(&self, event_id: EventId) -> AppResult<i64> {
        sqlx::query_scalar(
            r#"
                SELECT COUNT(*) FROM registrations WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_registered_events(&self, user_id: UserId) -> AppResult<Vec<RegisteredEvent>> {
        let rows: Vec<RegisteredEventRow> = sqlx::query_as(
            r#"
                SELECT
                    e.event_id,
                    e.title,
                    e.date,
                    e.location,
                    e.image_url,
                    r.registered_at,
                    r.certificate_url
                FROM registrations AS r
                INNER JOIN events AS e USING (event_id)
                WHERE r.user_id = $1
                ORDER BY r.registered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(RegisteredEvent::from).collect())
    }
}
