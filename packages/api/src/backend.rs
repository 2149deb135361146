//! # Server backends
//!
//! Handlers are generic over [`Backend`], which hands out a per-user store and
//! the account table. Two implementations:
//!
//! | Backend | Stores | Accounts |
//! |---------|--------|----------|
//! | [`PgBackend`] | [`PgStore`] | [`PgUsers`] |
//! | [`MemoryBackend`] | `LocalStore<MemoryStorage>` per user | [`MemoryUsers`] |
//!
//! The memory backend is selected with `storage.backend = "memory"` and is what
//! the route tests run against.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use store::{LocalStore, MemoryStorage, Store, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{PgStore, PgUsers};
use crate::models::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` is expected already normalised.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Validation`] when the email is taken.
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}

pub trait Backend: Clone + Send + Sync + 'static {
    type Store: Store + Send + Sync;
    type Users: UserStore;

    /// Data scoped to one user. Cheap; called once per request.
    fn store_for(&self, user_id: Uuid) -> Self::Store;

    fn users(&self) -> &Self::Users;
}

#[derive(Clone, Debug)]
pub struct PgBackend {
    pool: PgPool,
    users: PgUsers,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: PgUsers::new(pool.clone()),
            pool,
        }
    }
}

impl Backend for PgBackend {
    type Store = PgStore;
    type Users = PgUsers;

    fn store_for(&self, user_id: Uuid) -> PgStore {
        PgStore::new(self.pool.clone(), user_id)
    }

    fn users(&self) -> &PgUsers {
        &self.users
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryUsers {
    users: Arc<RwLock<Vec<User>>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Validation("User already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Everything in process memory. Each user gets an isolated [`LocalStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    stores: Arc<Mutex<HashMap<Uuid, MemoryStorage>>>,
    users: MemoryUsers,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn stores(&self) -> MutexGuard<'_, HashMap<Uuid, MemoryStorage>> {
        // The map only ever gains entries, so a poisoned guard is still consistent.
        self.stores.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Backend for MemoryBackend {
    type Store = LocalStore<MemoryStorage>;
    type Users = MemoryUsers;

    fn store_for(&self, user_id: Uuid) -> LocalStore<MemoryStorage> {
        let storage = self.stores().entry(user_id).or_default().clone();
        LocalStore::new(storage)
    }

    fn users(&self) -> &MemoryUsers {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::WorkTypeStore;

    #[tokio::test]
    async fn test_memory_backend_isolates_users() {
        let backend = MemoryBackend::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        backend
            .store_for(alice)
            .create_work_type("Reading")
            .await
            .unwrap();

        assert_eq!(backend.store_for(alice).list_work_types().await.unwrap().len(), 1);
        assert!(backend.store_for(bob).list_work_types().await.unwrap().is_empty());
        // Bob may use the same label.
        backend.store_for(bob).create_work_type("reading").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_users_reject_duplicate_email() {
        let users = MemoryUsers::default();
        let created = users
            .create_user("ada@example.com", Some("Ada"), "hash")
            .await
            .unwrap();
        assert_eq!(
            users.find_by_id(created.id).await.unwrap().map(|u| u.email),
            Some("ada@example.com".to_string())
        );
        assert!(matches!(
            users.create_user("ada@example.com", None, "hash").await,
            Err(StoreError::Validation(_))
        ));
    }
}
