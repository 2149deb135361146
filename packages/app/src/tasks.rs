//! # Task panel
//!
//! The in-memory task list a page shows, kept in step with the active store.
//!
//! - Creating is confirmed before it shows: the store's task is prepended on
//!   success; on failure the list is unchanged and [`TaskPanel::error`] is set.
//! - Toggling and deleting are optimistic (see [`crate::optimistic`]). A failed
//!   toggle flips the task back; a failed delete reloads the whole list.

use chrono::{DateTime, Duration, Utc};
use store::repo::validate_new_task;
use store::{NewTask, Store, StoreError, Task, TaskPatch, TaskStore, WorkType};
use tracing::warn;

use crate::optimistic::optimistic;

/// Quick picks in the due-date control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuePreset {
    Tomorrow,
    NextWeek,
}

impl DuePreset {
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DuePreset::Tomorrow => now + Duration::days(1),
            DuePreset::NextWeek => now + Duration::days(7),
        }
    }
}

/// Tasks of one work type, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup<'a> {
    /// `None` collects tasks whose work type no longer exists.
    pub work_type: Option<&'a WorkType>,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone)]
pub struct TaskPanel<S> {
    store: S,
    tasks: Vec<Task>,
    filter: Option<String>,
    error: Option<String>,
}

impl<S: Store> TaskPanel<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            filter: None,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Inline message from the last failed create.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Show only tasks of `work_type_id` (or all) and reload.
    pub async fn set_filter(&mut self, work_type_id: Option<String>) -> Result<(), StoreError> {
        self.filter = work_type_id;
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.tasks = self.store.list_tasks(self.filter.as_deref()).await?;
        Ok(())
    }

    pub async fn create(
        &mut self,
        title: &str,
        work_type_id: Option<&str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, StoreError> {
        let task = NewTask {
            title: title.trim().to_string(),
            work_type_id: work_type_id.unwrap_or_default().to_string(),
            due_date,
        };

        let result = match validate_new_task(&task) {
            Ok(()) => self.store.create_task(task).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(created) => {
                self.error = None;
                if self.matches_filter(&created) {
                    self.tasks.insert(0, created.clone());
                }
                Ok(created)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn toggle(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(completed) = self.tasks.iter().find(|t| t.id == id).map(|t| t.completed) else {
            return Err(StoreError::NotFound("Task not found".to_string()));
        };
        let flip = |tasks: &mut Vec<Task>, value: bool| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.completed = value;
            }
        };

        let write = self
            .store
            .update_task(TaskPatch::new(id).completed(!completed));
        let updated = optimistic(
            &mut self.tasks,
            |tasks| flip(tasks, !completed),
            write,
            |tasks| flip(tasks, completed),
        )
        .await
        .inspect_err(|e| warn!(task_id = id, "toggle failed, reverted: {}", e))?;

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *task = updated;
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let write = self.store.delete_task(id);
        let result = optimistic(
            &mut self.tasks,
            |tasks| tasks.retain(|t| t.id != id),
            write,
            |_| {},
        )
        .await;

        if let Err(e) = result {
            warn!(task_id = id, "delete failed, reloading: {}", e);
            if let Err(reload) = self.refresh().await {
                warn!("reload after failed delete also failed: {}", reload);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Groups in `work_types` order, followed by orphaned tasks. Empty groups are omitted.
    pub fn grouped_by_work_type<'a>(&'a self, work_types: &'a [WorkType]) -> Vec<TaskGroup<'a>> {
        let mut groups: Vec<TaskGroup<'a>> = work_types
            .iter()
            .map(|wt| TaskGroup {
                work_type: Some(wt),
                tasks: self.tasks.iter().filter(|t| t.work_type_id == wt.id).collect(),
            })
            .filter(|group| !group.tasks.is_empty())
            .collect();

        let orphans: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !work_types.iter().any(|wt| wt.id == t.work_type_id))
            .collect();
        if !orphans.is_empty() {
            groups.push(TaskGroup {
                work_type: None,
                tasks: orphans,
            });
        }
        groups
    }

    fn matches_filter(&self, task: &Task) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|id| id == task.work_type_id)
    }
}
