//! Credential authentication endpoints.
//!
//! Registration creates the account but does not sign in; the client follows
//! up with `/api/auth/login`. Emails are compared after trimming and
//! lower-casing.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tower_sessions::Session;
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;
use crate::auth::{hash_password, verify_password, SESSION_USER_ID_KEY};
use crate::backend::{Backend, UserStore};
use crate::error::ApiError;
use crate::wire::{LoginRequest, RegisterRequest, RegisterResponse, Success, UserEnvelope};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            Ok((normalize_email(&email), password))
        }
        _ => Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        )),
    }
}

pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(payload) = payload?;
    let (email, password) = credentials(payload.email, payload.password)?;
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let password_hash =
        hash_password(&password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let user = state
        .backend
        .users()
        .create_user(&email, name.as_deref(), &password_hash)
        .await?;
    info!(user_id = %user.id, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registration successful".to_string(),
            user: user.to_info(),
        }),
    ))
}

pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(payload) = payload?;
    let (email, password) = credentials(payload.email, payload.password)?;

    let user = state.backend.users().find_by_email(&email).await?;
    let verified = match &user {
        Some(user) => verify_password(&password, &user.password_hash).unwrap_or_else(|e| {
            warn!(user_id = %user.id, "unreadable password hash: {}", e);
            false
        }),
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        return Err(ApiError::InvalidCredentials);
    };

    session.cycle_id().await?;
    session
        .insert(SESSION_USER_ID_KEY, user.id.to_string())
        .await?;
    info!(user_id = %user.id, "signed in");

    Ok(Json(UserEnvelope {
        user: Some(user.to_info()),
    }))
}

pub async fn logout(session: Session) -> Result<Json<Success>, ApiError> {
    session.flush().await?;
    Ok(Json(Success::ok()))
}

/// The signed-in user, or `{"user": null}`. Never 401.
pub async fn me<B: Backend>(
    State(state): State<AppState<B>>,
    session: Session,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user_id: Option<String> = session.get(SESSION_USER_ID_KEY).await?;
    let Some(user_id) = user_id.and_then(|id| Uuid::parse_str(&id).ok()) else {
        return Ok(Json(UserEnvelope { user: None }));
    };
    let user = state.backend.users().find_by_id(user_id).await?;
    Ok(Json(UserEnvelope {
        user: user.map(|u| u.to_info()),
    }))
}
