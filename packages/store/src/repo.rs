//! # Store capabilities: one interface, several backends
//!
//! Every feature path (timer, task panel, work-type picker, charts) talks to its
//! data through the three traits defined here. Implementations:
//!
//! | Implementation | Crate | Used when |
//! |----------------|-------|-----------|
//! | [`crate::LocalStore`] | `store` | guest mode; data lives in browser-local (or file) key/value storage |
//! | `api::RemoteStore` | `api` | signed in; every call is an HTTP request to the server |
//! | `api::db::PgStore` | `api` (`server`) | server side; one instance per authenticated user |
//!
//! All implementations enforce the same rules: labels are unique
//! case-insensitively, and sessions/tasks may only point at a work type owned by
//! the same scope. The `validate_*` helpers below are the shared front half of
//! those checks.
//!
//! On wasm the futures are not `Send` (browser handles are single-threaded), so
//! the traits opt out of the `Send` bound there.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewStudySession, NewTask, StudySession, Task, TaskPatch, WorkType};

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait WorkTypeStore {
    async fn list_work_types(&self) -> Result<Vec<WorkType>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the label already exists (any case).
    async fn create_work_type(&self, label: &str) -> Result<WorkType, StoreError>;

    /// Does not touch sessions or tasks that reference the work type.
    async fn delete_work_type(&self, id: &str) -> Result<(), StoreError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SessionStore {
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StoreError>;

    async fn create_session(&self, session: NewStudySession) -> Result<StudySession, StoreError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TaskStore {
    /// Newest first. `work_type_id` narrows the list to one work type.
    async fn list_tasks(&self, work_type_id: Option<&str>) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn update_task(&self, patch: TaskPatch) -> Result<Task, StoreError>;

    async fn delete_task(&self, id: &str) -> Result<(), StoreError>;
}

/// Everything a page needs from its active backend.
pub trait Store: WorkTypeStore + SessionStore + TaskStore {}

impl<T: WorkTypeStore + SessionStore + TaskStore> Store for T {}

/// Trimmed label, or a validation error if nothing is left.
pub fn validate_label(label: &str) -> Result<&str, StoreError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(StoreError::Validation("Label is required".to_string()));
    }
    Ok(label)
}

pub fn validate_new_session(session: &NewStudySession) -> Result<(), StoreError> {
    if session.duration <= 0 || session.work_type_id.is_empty() {
        return Err(StoreError::Validation(
            "Date, duration, and workTypeId are required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_new_task(task: &NewTask) -> Result<(), StoreError> {
    if task.title.trim().is_empty() || task.work_type_id.is_empty() {
        return Err(StoreError::Validation(
            "Title and work type are required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_patch(patch: &TaskPatch) -> Result<(), StoreError> {
    if patch.id.is_empty() {
        return Err(StoreError::Validation("Task ID is required".to_string()));
    }
    if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
        return Err(StoreError::Validation("Title cannot be empty".to_string()));
    }
    Ok(())
}
