//! # Remote store: the signed-in adapter
//!
//! [`RemoteStore`] implements the store traits by calling the JSON API. The
//! session cookie is kept by the HTTP client (a cookie jar on native targets,
//! the browser itself on wasm).
//!
//! Error statuses map back onto [`StoreError`]:
//!
//! | Status | Error |
//! |--------|-------|
//! | 400 | `Validation(message)`, or `Conflict` for a duplicate work-type label |
//! | 401 | `Unauthorized` |
//! | 404 | `NotFound(message)` |
//! | anything else, or no response | `Transport` |

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use store::{
    NewStudySession, NewTask, SessionStore, StoreError, StudySession, Task, TaskPatch, TaskStore,
    WorkType, WorkTypeStore,
};
use tracing::debug;

use crate::models::UserInfo;
use crate::wire::{
    CreateSessionRequest, CreateTaskRequest, CreateWorkTypeRequest, ErrorBody, LoginRequest,
    RegisterRequest, RegisterResponse, Success, UserEnvelope,
};

/// The 400 message the server sends for a duplicate label.
const EXISTS_MESSAGE: &str = "Work type already exists";

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

#[derive(Clone, Debug)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let client = builder.build().map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        debug!(%status, %message, "api request failed");
        Err(match status {
            StatusCode::BAD_REQUEST => StoreError::Validation(message),
            StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            _ => StoreError::Transport(format!("{status}: {message}")),
        })
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
        Self::send(request).await?.json::<T>().await.map_err(transport)
    }

    /// `None` when no session is established.
    pub async fn current_user(&self) -> Result<Option<UserInfo>, StoreError> {
        let envelope: UserEnvelope = Self::fetch(self.request(Method::GET, "/api/auth/me")).await?;
        Ok(envelope.user)
    }

    /// Creates the account without signing in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserInfo, StoreError> {
        let body = RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            name: name.map(str::to_string),
        };
        let response: RegisterResponse =
            Self::fetch(self.request(Method::POST, "/api/auth/register").json(&body)).await?;
        Ok(response.user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserInfo, StoreError> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let envelope: UserEnvelope =
            Self::fetch(self.request(Method::POST, "/api/auth/login").json(&body)).await?;
        envelope
            .user
            .ok_or_else(|| StoreError::Transport("login returned no user".to_string()))
    }

    pub async fn sign_out(&self) -> Result<(), StoreError> {
        let _: Success = Self::fetch(self.request(Method::POST, "/api/auth/logout")).await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl WorkTypeStore for RemoteStore {
    async fn list_work_types(&self) -> Result<Vec<WorkType>, StoreError> {
        Self::fetch(self.request(Method::GET, "/api/work-types")).await
    }

    async fn create_work_type(&self, label: &str) -> Result<WorkType, StoreError> {
        let body = CreateWorkTypeRequest {
            label: Some(label.to_string()),
        };
        Self::fetch(self.request(Method::POST, "/api/work-types").json(&body))
            .await
            .map_err(|e| match e {
                StoreError::Validation(message) if message == EXISTS_MESSAGE => {
                    StoreError::Conflict(message)
                }
                other => other,
            })
    }

    async fn delete_work_type(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/api/work-types/{id}");
        let _: Success = Self::fetch(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl SessionStore for RemoteStore {
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StoreError> {
        Self::fetch(self.request(Method::GET, "/api/study-sessions")).await
    }

    async fn create_session(&self, session: NewStudySession) -> Result<StudySession, StoreError> {
        let body = CreateSessionRequest {
            date: Some(session.date),
            duration: Some(session.duration),
            work_type_id: Some(session.work_type_id),
        };
        Self::fetch(self.request(Method::POST, "/api/study-sessions").json(&body)).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl TaskStore for RemoteStore {
    async fn list_tasks(&self, work_type_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let mut request = self.request(Method::GET, "/api/tasks");
        if let Some(work_type_id) = work_type_id {
            request = request.query(&[("workTypeId", work_type_id)]);
        }
        Self::fetch(request).await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let body = CreateTaskRequest {
            title: Some(task.title),
            work_type_id: Some(task.work_type_id),
            due_date: task.due_date,
        };
        Self::fetch(self.request(Method::POST, "/api/tasks").json(&body)).await
    }

    async fn update_task(&self, patch: TaskPatch) -> Result<Task, StoreError> {
        Self::fetch(self.request(Method::PATCH, "/api/tasks").json(&patch)).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let request = self
            .request(Method::DELETE, "/api/tasks")
            .query(&[("id", id)]);
        let _: Success = Self::fetch(request).await?;
        Ok(())
    }
}
