//! # User model for registered accounts
//!
//! Defines the two representations of a StudyFlow user:
//!
//! ## [`User`] (server only)
//!
//! The complete row from the `users` table. It derives [`sqlx::FromRow`] so it can
//! be loaded directly from queries:
//!
//! - `id`: primary key (`UUID`).
//! - `email`: normalised (trimmed, lower-case) sign-in identifier, unique.
//! - `name`: optional display name given at registration.
//! - `password_hash`: Argon2 PHC string.
//! - `created_at` / `updated_at`: audit timestamps.
//!
//! ## [`UserInfo`]
//!
//! The client-safe projection returned by the auth endpoints. It omits the password
//! hash and converts the `Uuid` to a `String` so it also works in WASM builds.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut info = UserInfo {
            id: "1".into(),
            email: "ada@example.com".into(),
            name: None,
        };
        assert_eq!(info.display_name(), "ada@example.com");
        info.name = Some("Ada".into());
        assert_eq!(info.display_name(), "Ada");
    }
}
