//! # Local store adapter: guest-mode persistence
//!
//! [`LocalStore`] implements the store traits on top of any [`Storage`]. Each
//! collection is one JSON array under its key (see [`crate::storage`]); every
//! write is a read-modify-write of the whole array, exactly as a browser page
//! would do against `localStorage`.
//!
//! Identifiers are generated locally (UUID v4, simple form). Ownership rules match
//! the server: a session or task must point at a work type present in this store,
//! and labels are unique regardless of case.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    find_by_label, NewStudySession, NewTask, StudySession, Task, TaskPatch, WorkType,
};
use crate::repo::{
    validate_label, validate_new_session, validate_new_task, validate_patch, SessionStore,
    TaskStore, WorkTypeStore,
};
use crate::storage::{Storage, STUDY_SESSIONS_KEY, TASKS_KEY, WORK_TYPES_KEY};

#[derive(Clone, Debug)]
pub struct LocalStore<S> {
    storage: S,
}

impl<S: Storage> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.storage.get_item(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(key, &raw)
    }

    fn ensure_work_type(&self, work_type_id: &str) -> Result<(), StoreError> {
        let work_types: Vec<WorkType> = self.read(WORK_TYPES_KEY)?;
        if work_types.iter().any(|wt| wt.id == work_type_id) {
            Ok(())
        } else {
            Err(StoreError::invalid_work_type())
        }
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> WorkTypeStore for LocalStore<S> {
    async fn list_work_types(&self) -> Result<Vec<WorkType>, StoreError> {
        self.read(WORK_TYPES_KEY)
    }

    async fn create_work_type(&self, label: &str) -> Result<WorkType, StoreError> {
        let label = validate_label(label)?;
        let mut work_types: Vec<WorkType> = self.read(WORK_TYPES_KEY)?;
        if find_by_label(&work_types, label).is_some() {
            return Err(StoreError::work_type_exists());
        }

        let work_type = WorkType {
            id: generate_id(),
            label: label.to_string(),
        };
        work_types.push(work_type.clone());
        self.write(WORK_TYPES_KEY, &work_types)?;
        debug!(id = %work_type.id, "created local work type");
        Ok(work_type)
    }

    async fn delete_work_type(&self, id: &str) -> Result<(), StoreError> {
        let mut work_types: Vec<WorkType> = self.read(WORK_TYPES_KEY)?;
        let before = work_types.len();
        work_types.retain(|wt| wt.id != id);
        if work_types.len() == before {
            return Err(StoreError::NotFound("Work type not found".to_string()));
        }
        self.write(WORK_TYPES_KEY, &work_types)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> SessionStore for LocalStore<S> {
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StoreError> {
        let mut sessions: Vec<StudySession> = self.read(STUDY_SESSIONS_KEY)?;
        sessions.sort_by_key(|s| s.date);
        Ok(sessions)
    }

    async fn create_session(&self, session: NewStudySession) -> Result<StudySession, StoreError> {
        validate_new_session(&session)?;
        self.ensure_work_type(&session.work_type_id)?;

        let mut sessions: Vec<StudySession> = self.read(STUDY_SESSIONS_KEY)?;
        let created = StudySession {
            id: generate_id(),
            date: session.date,
            duration: session.duration,
            work_type_id: session.work_type_id,
        };
        sessions.push(created.clone());
        self.write(STUDY_SESSIONS_KEY, &sessions)?;
        Ok(created)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> TaskStore for LocalStore<S> {
    async fn list_tasks(&self, work_type_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self.read(TASKS_KEY)?;
        if let Some(work_type_id) = work_type_id {
            tasks.retain(|t| t.work_type_id == work_type_id);
        }
        // Stored oldest-first; reversing before the stable sort keeps the
        // latest insert on top for equal timestamps.
        tasks.reverse();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        validate_new_task(&task)?;
        self.ensure_work_type(&task.work_type_id)?;

        let mut tasks: Vec<Task> = self.read(TASKS_KEY)?;
        let created = Task {
            id: generate_id(),
            title: task.title.trim().to_string(),
            completed: false,
            due_date: task.due_date,
            work_type_id: task.work_type_id,
            created_at: Utc::now(),
        };
        tasks.push(created.clone());
        self.write(TASKS_KEY, &tasks)?;
        Ok(created)
    }

    async fn update_task(&self, patch: TaskPatch) -> Result<Task, StoreError> {
        validate_patch(&patch)?;
        let mut tasks: Vec<Task> = self.read(TASKS_KEY)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == patch.id)
            .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))?;

        if let Some(work_type_id) = &patch.work_type_id {
            if *work_type_id != task.work_type_id {
                self.ensure_work_type(work_type_id)?;
            }
        }

        patch.apply_to(task);
        let updated = task.clone();
        self.write(TASKS_KEY, &tasks)?;
        Ok(updated)
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let mut tasks: Vec<Task> = self.read(TASKS_KEY)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound("Task not found".to_string()));
        }
        self.write(TASKS_KEY, &tasks)
    }
}
