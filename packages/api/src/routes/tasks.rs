//! `/api/tasks`
//!
//! Updates and deletes take the task id from the body and query string
//! respectively, so a missing id is a 400 rather than a routing miss.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use store::{NewTask, StoreError, Task, TaskPatch, TaskStore};

use super::AppState;
use crate::auth::CurrentUser;
use crate::backend::Backend;
use crate::error::ApiError;
use crate::wire::{CreateTaskRequest, Success, TaskIdQuery, TaskListQuery};

/// Newest first, optionally narrowed to `?workTypeId=`.
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(query) = query?;
    let work_type_id = query.work_type_id.filter(|id| !id.is_empty());
    let store = state.backend.store_for(user_id);
    Ok(Json(store.list_tasks(work_type_id.as_deref()).await?))
}

pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload?;
    let task = NewTask {
        title: payload.title.unwrap_or_default(),
        work_type_id: payload.work_type_id.unwrap_or_default(),
        due_date: payload.due_date,
    };
    let store = state.backend.store_for(user_id);
    let created = store.create_task(task).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(patch) = payload?;
    let store = state.backend.store_for(user_id);
    Ok(Json(store.update_task(patch).await?))
}

pub async fn remove<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
) -> Result<Json<Success>, ApiError> {
    let Query(query) = query?;
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return Err(StoreError::Validation("Task ID is required".to_string()).into());
    };
    let store = state.backend.store_for(user_id);
    store.delete_task(&id).await?;
    Ok(Json(Success::ok()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::routes::test_support::TestApp;

    async fn work_type(app: &mut TestApp, label: &str) -> String {
        let (_, created) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": label })))
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    async fn task(app: &mut TestApp, title: &str, work_type_id: &str) -> Value {
        let (status, created) = app
            .send(
                Method::POST,
                "/api/tasks",
                Some(json!({ "title": title, "workTypeId": work_type_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        created
    }

    #[tokio::test]
    async fn test_create_and_filter() {
        let mut app = TestApp::signed_in().await;
        let math = work_type(&mut app, "Math").await;
        let reading = work_type(&mut app, "Reading").await;
        let created = task(&mut app, "Problem set 4", &math).await;
        assert_eq!(created["completed"], false);
        assert!(created["dueDate"].is_null());
        task(&mut app, "Chapter 2", &reading).await;

        let (_, all) = app.send(Method::GET, "/api/tasks", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["title"], "Chapter 2");

        let (_, filtered) = app
            .send(Method::GET, &format!("/api/tasks?workTypeId={math}"), None)
            .await;
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["title"], "Problem set 4");
    }

    #[tokio::test]
    async fn test_create_validates() {
        let mut app = TestApp::signed_in().await;
        let (status, body) = app
            .send(Method::POST, "/api/tasks", Some(json!({ "title": "Essay" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title and work type are required");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/tasks",
                Some(json!({ "title": "Essay", "workTypeId": "nope" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid work type");
    }

    #[tokio::test]
    async fn test_patch_toggles_and_clears_due_date() {
        let mut app = TestApp::signed_in().await;
        let math = work_type(&mut app, "Math").await;
        let (_, created) = app
            .send(
                Method::POST,
                "/api/tasks",
                Some(json!({
                    "title": "Quiz",
                    "workTypeId": math,
                    "dueDate": "2024-03-02T00:00:00Z"
                })),
            )
            .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = app
            .send(Method::PATCH, "/api/tasks", Some(json!({ "id": id, "completed": true })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["dueDate"], "2024-03-02T00:00:00Z");

        let (_, cleared) = app
            .send(Method::PATCH, "/api/tasks", Some(json!({ "id": id, "dueDate": null })))
            .await;
        assert!(cleared["dueDate"].is_null());
        assert_eq!(cleared["completed"], true);
    }

    #[tokio::test]
    async fn test_patch_and_delete_errors() {
        let mut app = TestApp::signed_in().await;
        let (status, body) = app
            .send(Method::PATCH, "/api/tasks", Some(json!({ "completed": true })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task ID is required");

        let (status, body) = app
            .send(Method::PATCH, "/api/tasks", Some(json!({ "id": "ghost", "completed": true })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");

        let (status, body) = app.send(Method::DELETE, "/api/tasks", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task ID is required");

        let (status, _) = app.send(Method::DELETE, "/api/tasks?id=ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tasks_are_private() {
        let mut app = TestApp::signed_in().await;
        let math = work_type(&mut app, "Math").await;
        let created = task(&mut app, "Quiz", &math).await;
        let id = created["id"].as_str().unwrap().to_string();

        app.sign_out_locally();
        app.sign_up_and_in("bob@example.com", "pw").await;
        let (_, list) = app.send(Method::GET, "/api/tasks", None).await;
        assert!(list.as_array().unwrap().is_empty());

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/tasks?id={id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
