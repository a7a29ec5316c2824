use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Identity;

/// Handler で Identity を受け取るための extractor
/// auth middleware が Identity を request.extensions() に insert 済みである前提
/// 見つからない場合は配線ミスなので 500 (クライアント起因ではない)
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(identity) => Ok(AuthIdentity(identity.clone())),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "no identity in request extensions: route is not behind auth middleware"
                );
                Err(AppError::Internal)
            }
        }
    }
}
