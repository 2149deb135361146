//! `/api/study-sessions`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use store::{NewStudySession, SessionStore, StoreError, StudySession};

use super::AppState;
use crate::auth::CurrentUser;
use crate::backend::Backend;
use crate::error::ApiError;
use crate::wire::CreateSessionRequest;

/// Ordered by date, oldest first.
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<StudySession>>, ApiError> {
    let store = state.backend.store_for(user_id);
    Ok(Json(store.list_sessions().await?))
}

pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<StudySession>, ApiError> {
    let Json(payload) = payload?;
    let (Some(date), Some(duration), Some(work_type_id)) =
        (payload.date, payload.duration, payload.work_type_id)
    else {
        return Err(StoreError::Validation(
            "Date, duration, and workTypeId are required".to_string(),
        )
        .into());
    };

    let store = state.backend.store_for(user_id);
    let session = store
        .create_session(NewStudySession {
            date,
            duration,
            work_type_id,
        })
        .await?;
    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    async fn work_type(app: &mut TestApp, label: &str) -> String {
        let (_, created) = app
            .send(Method::POST, "/api/work-types", Some(json!({ "label": label })))
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_sessions_are_listed_by_date() {
        let mut app = TestApp::signed_in().await;
        let id = work_type(&mut app, "Math").await;
        for date in ["2024-03-05T10:00:00Z", "2024-03-01T10:00:00Z"] {
            let (status, _) = app
                .send(
                    Method::POST,
                    "/api/study-sessions",
                    Some(json!({ "date": date, "duration": 25, "workTypeId": id })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, sessions) = app.send(Method::GET, "/api/study-sessions", None).await;
        let sessions = sessions.as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["date"], "2024-03-01T10:00:00Z");
        assert_eq!(sessions[0]["duration"], 25);
    }

    #[tokio::test]
    async fn test_invalid_sessions_are_rejected() {
        let mut app = TestApp::signed_in().await;
        let id = work_type(&mut app, "Math").await;

        let (status, body) = app
            .send(Method::POST, "/api/study-sessions", Some(json!({ "duration": 25 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Date, duration, and workTypeId are required");

        let zero = json!({ "date": "2024-03-01T10:00:00Z", "duration": 0, "workTypeId": id });
        let (status, _) = app.send(Method::POST, "/api/study-sessions", Some(zero)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let foreign =
            json!({ "date": "2024-03-01T10:00:00Z", "duration": 10, "workTypeId": "missing" });
        let (status, body) = app.send(Method::POST, "/api/study-sessions", Some(foreign)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid work type");
    }
}
