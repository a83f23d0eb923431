use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{auth::AccessToken, id::UserId, user::User};
use registry::AppRegistry;
use shared::error::AppError;

/// Bearer トークンを検証して参加者を取り出すエクストラクタ。
/// ブロック済みアカウントはここで弾く。
pub struct AuthorizedParticipant(pub User);

impl AuthorizedParticipant {
    pub fn id(&self) -> UserId {
        self.0.user_id
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedParticipant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        // Authorization ヘッダーが無い、または Bearer でない場合は 401
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::UnauthenticatedError)?;

        let access_token = AccessToken(bearer.token().to_string());
        let user_id = registry
            .auth_repository()
            .fetch_participant_id(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        if user.is_blocked {
            return Err(AppError::BlockedAccountError);
        }

        Ok(Self(user))
    }
}
