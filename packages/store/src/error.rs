//! Error type shared by every store adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or malformed input. Maps to 400.
    #[error("{0}")]
    Validation(String),
    /// A work type with the same label already exists for this owner.
    #[error("{0}")]
    Conflict(String),
    /// Absent, or owned by someone else. Maps to 404.
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The backing storage failed (local storage, file system, database).
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Network failure or unexpected response from the remote API.
    #[error("transport error: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn invalid_work_type() -> Self {
        StoreError::Validation("Invalid work type".to_string())
    }

    pub fn work_type_exists() -> Self {
        StoreError::Conflict("Work type already exists".to_string())
    }
}
