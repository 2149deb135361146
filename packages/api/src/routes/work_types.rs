//! `/api/work-types`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use store::{WorkType, WorkTypeStore};

use super::AppState;
use crate::auth::CurrentUser;
use crate::backend::Backend;
use crate::error::ApiError;
use crate::wire::{CreateWorkTypeRequest, Success};

pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<WorkType>>, ApiError> {
    let store = state.backend.store_for(user_id);
    Ok(Json(store.list_work_types().await?))
}

pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateWorkTypeRequest>, JsonRejection>,
) -> Result<Json<WorkType>, ApiError> {
    let Json(payload) = payload?;
    let label = payload.label.unwrap_or_default();
    let store = state.backend.store_for(user_id);
    Ok(Json(store.create_work_type(&label).await?))
}

/// Sessions and tasks that point at the work type are left in place.
pub async fn remove<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    let store = state.backend.store_for(user_id);
    store.delete_work_type(&id).await?;
    Ok(Json(Success::ok()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_labels_are_unique_ignoring_case() {
        let mut app = TestApp::signed_in().await;
        let (status, created) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": "Reading" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["label"], "Reading");

        let (status, body) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": "reading" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Work type already exists");

        let (_, list) = app.send(Method::GET, "/api/work-types", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_label_is_rejected() {
        let mut app = TestApp::signed_in().await;
        let (status, body) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": "  " })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Label is required");

        let (status, _) = app.send(Method::POST, "/api/work-types", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_users_work_types_are_not_found() {
        let mut app = TestApp::signed_in().await;
        let (_, created) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": "Math" })))
            .await;
        let id = created["id"].as_str().unwrap().to_string();

        app.sign_out_locally();
        app.sign_up_and_in("bob@example.com", "pw").await;
        let (status, body) = app
            .send(Method::DELETE, &format!("/api/work-types/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Work type not found");
    }

    #[tokio::test]
    async fn test_delete_keeps_sessions() {
        let mut app = TestApp::signed_in().await;
        let (_, created) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": "Math" })))
            .await;
        let id = created["id"].as_str().unwrap().to_string();
        let (status, _) = app
            .send(
                Method::POST,
                "/api/study-sessions",
                Some(json!({ "date": "2024-03-01T10:00:00Z", "duration": 30, "workTypeId": id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .send(Method::DELETE, &format!("/api/work-types/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, sessions) = app.send(Method::GET, "/api/study-sessions", None).await;
        assert_eq!(sessions[0]["workTypeId"], id.as_str());
    }
}
