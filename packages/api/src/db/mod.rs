//! # Database module: PostgreSQL persistence for signed-in users
//!
//! Gated behind `server` so client builds never pull in SQLx.
//!
//! - [`connect`] opens a pool from [`crate::settings::Database`].
//! - [`migrate`] applies `migrations/` (tables `users`, `work_types`,
//!   `study_sessions`, `tasks`).
//! - [`PgStore`] implements the store traits for one user.
//! - [`PgUsers`] looks up and creates accounts.

mod pg;
mod pool;

pub use pg::{PgStore, PgUsers};
pub use pool::{connect, migrate};
