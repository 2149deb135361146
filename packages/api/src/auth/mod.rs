//! Credential authentication: password hashing and the session-backed user extractor.

mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{CurrentUser, SESSION_USER_ID_KEY};
