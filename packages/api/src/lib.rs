//! # API crate: the StudyFlow HTTP surface
//!
//! Both sides of the JSON API live here so the wire format is defined once.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`client`] | none | [`RemoteStore`], the store adapter used while signed in |
//! | [`models`] | none | `User` (server) and its client-safe projection [`UserInfo`] |
//! | [`wire`] | none | Request and response bodies |
//! | [`auth`] | `server` | Argon2 password hashing and the [`auth::CurrentUser`] session extractor |
//! | [`backend`] | `server` | The [`backend::Backend`] seam with Postgres and in-memory implementations |
//! | [`db`] | `server` | Connection pool, migrations and the Postgres stores |
//! | [`error`] | `server` | `ApiError` and its status-code mapping |
//! | [`routes`] | `server` | The axum [`routes::router`] |
//! | [`settings`] | `server` | Layered configuration (`config.toml`, `STUDYFLOW__*`, `DATABASE_URL`) |

pub mod client;
pub mod models;
pub mod wire;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod settings;

pub use client::RemoteStore;
pub use models::UserInfo;
