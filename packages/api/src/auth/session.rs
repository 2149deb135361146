//! Session keys and the authenticated-user extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::ApiError;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The signed-in user's id, read from the session cookie.
///
/// Rejects with 401 when the session carries no (or an unparsable) user id, so
/// every data handler that takes a `CurrentUser` is authenticated by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(msg.to_string()))?;

        let user_id: Option<String> = session.get(SESSION_USER_ID_KEY).await?;
        user_id
            .and_then(|id| Uuid::parse_str(&id).ok())
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}
