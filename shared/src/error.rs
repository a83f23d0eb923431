use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("registration for this event is closed")]
    EventClosed,
    #[error("event is already at full capacity")]
    EventFull,
    #[error("participant is already registered for this event")]
    AlreadyRegistered,
    #[error("participant is not registered for this event")]
    NotRegistered,
    #[error("check-in code encoding failed: {0}")]
    EncodingFailed(String),
    #[error("certificate composition failed: {0}")]
    CompositionFailed(String),
    #[error("certificate store is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("certificate store rejected the write: {0}")]
    StoreWriteRejected(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error(transparent)]
    ConversionEntityError(#[from] uuid::Error),
    #[error("認証情報が正しくありません。")]
    UnauthenticatedError,
    #[error("このアカウントはブロックされています。")]
    BlockedAccountError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) | AppError::EventClosed | AppError::EventFull => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ValidationError(_) | AppError::ConversionEntityError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) | AppError::NotRegistered => StatusCode::NOT_FOUND,
            AppError::AlreadyRegistered => StatusCode::CONFLICT,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::BlockedAccountError => StatusCode::FORBIDDEN,
            AppError::EncodingFailed(_)
            | AppError::CompositionFailed(_)
            | AppError::StoreUnavailable(_)
            | AppError::StoreWriteRejected(_)
            | AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::KeyValueStoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        } else {
            tracing::warn!(
                error.cause_chain = ?self,
                error.message = %self,
                "request was rejected"
            );
        }

        status_code.into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_client_status() {
        assert_eq!(
            AppError::AlreadyRegistered.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::EventFull.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::NotRegistered.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BlockedAccountError.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn infrastructure_errors_map_to_server_status() {
        assert_eq!(
            AppError::StoreUnavailable("timeout".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::CompositionFailed("draw".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
