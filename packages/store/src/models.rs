//! # Domain models for work types, study sessions and tasks
//!
//! These are the records every store adapter reads and writes. They are
//! `Serialize + Deserialize` with camelCase field names so the same shape is used
//! on the HTTP wire and inside browser-local storage.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`WorkType`] | A user-defined category ("Reading", "Math") that sessions and tasks point at. |
//! | [`StudySession`] | One completed timer run. Immutable once created. |
//! | [`Task`] | A to-do item tied to a work type, with optional due date. |
//! | [`NewStudySession`] / [`NewTask`] | Create payloads, before an id is assigned. |
//! | [`TaskPatch`] | Partial update for a task. `due_date` is tri-state. |
//!
//! ## Helpers
//!
//! - [`same_label`]: case-insensitive label comparison used for uniqueness checks.
//! - [`find_by_label`]: resolves a label against a list of work types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A category owned by one identity scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkType {
    pub id: String,
    pub label: String,
}

/// A recorded stretch of study time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Minutes.
    pub duration: i32,
    pub work_type_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudySession {
    pub date: DateTime<Utc>,
    pub duration: i32,
    pub work_type_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub work_type_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub work_type_id: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial task update.
///
/// `due_date` distinguishes "leave alone" (`None`) from "clear" (`Some(None)`):
/// on the wire an absent `dueDate` key is the former, `"dueDate": null` the latter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn work_type(mut self, work_type_id: impl Into<String>) -> Self {
        self.work_type_id = Some(work_type_id.into());
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Apply the present fields to `task` in place. Titles are stored trimmed.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(work_type_id) = &self.work_type_id {
            task.work_type_id = work_type_id.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

// A present key (even `null`) becomes `Some(..)`; an absent key falls back to `default`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

/// Case-insensitive label equality.
pub fn same_label(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Find a work type whose label matches `label` case-insensitively.
pub fn find_by_label<'a>(work_types: &'a [WorkType], label: &str) -> Option<&'a WorkType> {
    work_types.iter().find(|wt| same_label(&wt.label, label))
}
