//! PostgreSQL-backed stores.
//!
//! Every query is scoped by `user_id`; a row owned by someone else is reported
//! exactly like a missing one. Ids that are not valid UUIDs are treated the same
//! way, since they cannot name any row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::repo::{validate_label, validate_new_session, validate_new_task, validate_patch};
use store::{
    NewStudySession, NewTask, SessionStore, StoreError, StudySession, Task, TaskPatch, TaskStore,
    WorkType, WorkTypeStore,
};
use tracing::debug;
use uuid::Uuid;

use crate::backend::UserStore;
use crate::models::User;

fn db_error(err: sqlx::Error) -> StoreError {
    StoreError::Storage(err.to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn task_not_found() -> StoreError {
    StoreError::NotFound("Task not found".to_string())
}

#[derive(FromRow)]
struct WorkTypeRow {
    id: Uuid,
    label: String,
}

impl From<WorkTypeRow> for WorkType {
    fn from(row: WorkTypeRow) -> Self {
        WorkType {
            id: row.id.to_string(),
            label: row.label,
        }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    date: DateTime<Utc>,
    duration: i32,
    work_type_id: Uuid,
}

impl From<SessionRow> for StudySession {
    fn from(row: SessionRow) -> Self {
        StudySession {
            id: row.id.to_string(),
            date: row.date,
            duration: row.duration,
            work_type_id: row.work_type_id.to_string(),
        }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    completed: bool,
    due_date: Option<DateTime<Utc>>,
    work_type_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id.to_string(),
            title: row.title,
            completed: row.completed,
            due_date: row.due_date,
            work_type_id: row.work_type_id.to_string(),
            created_at: row.created_at,
        }
    }
}

const TASK_COLUMNS: &str = "id, title, completed, due_date, work_type_id, created_at";

/// The stores of one signed-in user.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    user_id: Uuid,
}

impl PgStore {
    pub fn new(pool: PgPool, user_id: Uuid) -> Self {
        Self { pool, user_id }
    }

    /// Parse `id` and check the work type belongs to this user.
    async fn owned_work_type(&self, id: &str) -> Result<Uuid, StoreError> {
        let id = Uuid::parse_str(id).map_err(|_| StoreError::invalid_work_type())?;
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM work_types WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(self.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        if owned {
            Ok(id)
        } else {
            Err(StoreError::invalid_work_type())
        }
    }
}

#[async_trait]
impl WorkTypeStore for PgStore {
    async fn list_work_types(&self) -> Result<Vec<WorkType>, StoreError> {
        let rows: Vec<WorkTypeRow> = sqlx::query_as(
            "SELECT id, label FROM work_types WHERE user_id = $1 ORDER BY created_at, label",
        )
        .bind(self.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(WorkType::from).collect())
    }

    async fn create_work_type(&self, label: &str) -> Result<WorkType, StoreError> {
        let label = validate_label(label)?;
        let row: WorkTypeRow = sqlx::query_as(
            "INSERT INTO work_types (user_id, label) VALUES ($1, $2) RETURNING id, label",
        )
        .bind(self.user_id)
        .bind(label)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::work_type_exists()
            } else {
                db_error(e)
            }
        })?;
        debug!(user_id = %self.user_id, work_type_id = %row.id, "created work type");
        Ok(row.into())
    }

    async fn delete_work_type(&self, id: &str) -> Result<(), StoreError> {
        let not_found = || StoreError::NotFound("Work type not found".to_string());
        let id = Uuid::parse_str(id).map_err(|_| not_found())?;
        let result = sqlx::query("DELETE FROM work_types WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(self.user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StoreError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT id, date, duration, work_type_id FROM study_sessions \
             WHERE user_id = $1 ORDER BY date",
        )
        .bind(self.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(StudySession::from).collect())
    }

    async fn create_session(&self, session: NewStudySession) -> Result<StudySession, StoreError> {
        validate_new_session(&session)?;
        let work_type_id = self.owned_work_type(&session.work_type_id).await?;
        let row: SessionRow = sqlx::query_as(
            "INSERT INTO study_sessions (user_id, work_type_id, date, duration) \
             VALUES ($1, $2, $3, $4) RETURNING id, date, duration, work_type_id",
        )
        .bind(self.user_id)
        .bind(work_type_id)
        .bind(session.date)
        .bind(session.duration)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.into())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, work_type_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let rows: Vec<TaskRow> = match work_type_id {
            Some(work_type_id) => {
                let Ok(work_type_id) = Uuid::parse_str(work_type_id) else {
                    return Ok(Vec::new());
                };
                sqlx::query_as(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND work_type_id = $2 \
                     ORDER BY created_at DESC"
                ))
                .bind(self.user_id)
                .bind(work_type_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC"
                ))
                .bind(self.user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        validate_new_task(&task)?;
        let work_type_id = self.owned_work_type(&task.work_type_id).await?;
        let row: TaskRow = sqlx::query_as(&format!(
            "INSERT INTO tasks (user_id, work_type_id, title, due_date) \
             VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        ))
        .bind(self.user_id)
        .bind(work_type_id)
        .bind(task.title.trim())
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.into())
    }

    async fn update_task(&self, patch: TaskPatch) -> Result<Task, StoreError> {
        validate_patch(&patch)?;
        let id = Uuid::parse_str(&patch.id).map_err(|_| task_not_found())?;

        let current: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(self.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        let mut task: Task = current.ok_or_else(task_not_found)?.into();

        if let Some(work_type_id) = &patch.work_type_id {
            if *work_type_id != task.work_type_id {
                self.owned_work_type(work_type_id).await?;
            }
        }
        patch.apply_to(&mut task);
        let work_type_id =
            Uuid::parse_str(&task.work_type_id).map_err(|_| StoreError::invalid_work_type())?;

        let row: TaskRow = sqlx::query_as(&format!(
            "UPDATE tasks SET title = $3, completed = $4, work_type_id = $5, due_date = $6, \
             updated_at = NOW() WHERE id = $1 AND user_id = $2 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(self.user_id)
        .bind(task.title.trim())
        .bind(task.completed)
        .bind(work_type_id)
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(task_not_found)?;
        Ok(row.into())
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let id = Uuid::parse_str(id).map_err(|_| task_not_found())?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(self.user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        Ok(())
    }
}

/// Account lookups against the `users` table.
#[derive(Clone, Debug)]
pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        sqlx::query_as(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Validation("User already exists".to_string())
            } else {
                db_error(e)
            }
        })
    }
}
