//! # HTTP routes
//!
//! [`router`] assembles the JSON API over any [`Backend`]. The session layer is
//! not added here; the caller wraps the router in a `SessionManagerLayer` with
//! whichever session store matches its backend.
//!
//! | Prefix | Module |
//! |--------|--------|
//! | `/api/auth` | [`auth`] |
//! | `/api/work-types` | [`work_types`] |
//! | `/api/tasks` | [`tasks`] |
//! | `/api/study-sessions` | [`study_sessions`] |
//! | `/health` | liveness probe |

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::backend::Backend;

pub mod auth;
pub mod study_sessions;
pub mod tasks;
pub mod work_types;

#[derive(Clone)]
pub struct AppState<B> {
    pub backend: B,
}

pub fn router<B: Backend>(backend: B) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register::<B>))
        .route("/api/auth/login", post(auth::login::<B>))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me::<B>))
        .route(
            "/api/work-types",
            get(work_types::list::<B>).post(work_types::create::<B>),
        )
        .route("/api/work-types/{id}", delete(work_types::remove::<B>))
        .route(
            "/api/tasks",
            get(tasks::list::<B>)
                .post(tasks::create::<B>)
                .patch(tasks::update::<B>)
                .delete(tasks::remove::<B>),
        )
        .route(
            "/api/study-sessions",
            get(study_sessions::list::<B>).post(study_sessions::create::<B>),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { backend })
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Drives the router with `oneshot`, carrying the session cookie between calls.

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use crate::backend::MemoryBackend;

    pub struct TestApp {
        router: Router,
        cookie: Option<String>,
    }

    impl TestApp {
        pub fn new() -> Self {
            let layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
            Self {
                router: super::router(MemoryBackend::new()).layer(layer),
                cookie: None,
            }
        }

        /// A fresh app with `ada@example.com` registered and signed in.
        pub async fn signed_in() -> Self {
            let mut app = Self::new();
            app.sign_up_and_in("ada@example.com", "correct horse").await;
            app
        }

        pub async fn sign_up_and_in(&mut self, email: &str, password: &str) {
            let body = serde_json::json!({ "email": email, "password": password });
            let (status, _) = self
                .send(Method::POST, "/api/auth/register", Some(body.clone()))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            let (status, _) = self.send(Method::POST, "/api/auth/login", Some(body)).await;
            assert_eq!(status, StatusCode::OK);
        }

        pub fn sign_out_locally(&mut self) {
            self.cookie = None;
        }

        pub async fn send(
            &mut self,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                request = request.header(header::COOKIE, cookie);
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                // A flushed session answers with an emptied cookie.
                self.cookie = match pair.split_once('=') {
                    Some((_, value)) if !value.is_empty() => Some(pair.to_string()),
                    _ => None,
                };
            }
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }
}
