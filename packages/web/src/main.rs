//! StudyFlow HTTP server.
//!
//! Reads [`Settings`], picks the storage backend, wraps the API router in a
//! session layer backed by the matching session store and serves it.

use anyhow::Context;
use api::backend::{Backend, MemoryBackend, PgBackend};
use api::settings::{Settings, StorageBackend};
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,api=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::new().context("failed to load settings")?;

    match settings.storage.backend {
        StorageBackend::Postgres => {
            let pool = api::db::connect(&settings.database)
                .await
                .context("failed to connect to database")?;
            api::db::migrate(&pool)
                .await
                .context("failed to run migrations")?;

            let sessions = PostgresStore::new(pool.clone());
            sessions
                .migrate()
                .await
                .context("failed to create session table")?;

            serve(&settings, PgBackend::new(pool), sessions).await
        }
        StorageBackend::Memory => {
            tracing::warn!("in-memory storage: all data is lost on restart");
            serve(&settings, MemoryBackend::new(), MemoryStore::default()).await
        }
    }
}

async fn serve<B, S>(settings: &Settings, backend: B, sessions: S) -> anyhow::Result<()>
where
    B: Backend,
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(sessions)
        .with_secure(settings.session.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            settings.session.expiry_days,
        )));

    let app = api::routes::router(backend).layer(session_layer);

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
