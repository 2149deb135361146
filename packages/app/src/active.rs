//! The store a resolved page talks to.

use api::RemoteStore;
use store::{
    LocalStore, NewStudySession, NewTask, SessionStore, Storage, StoreError, StudySession, Task,
    TaskPatch, TaskStore, WorkType, WorkTypeStore,
};

use crate::mode::{Identity, Mode};

/// Exactly one backend per page: the server while signed in, local storage for guests.
#[derive(Clone, Debug)]
pub enum ActiveStore<S> {
    Remote(RemoteStore),
    Local(LocalStore<S>),
}

impl<S: Storage> ActiveStore<S> {
    /// `None` unless `mode` is [`Mode::Active`].
    pub fn for_mode(mode: &Mode, remote: RemoteStore, storage: S) -> Option<Self> {
        match mode {
            Mode::Active(Identity::User(_)) => Some(ActiveStore::Remote(remote)),
            Mode::Active(Identity::Guest) => Some(ActiveStore::Local(LocalStore::new(storage))),
            Mode::Pending | Mode::Redirect(_) => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, ActiveStore::Local(_))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> WorkTypeStore for ActiveStore<S> {
    async fn list_work_types(&self) -> Result<Vec<WorkType>, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.list_work_types().await,
            ActiveStore::Local(local) => local.list_work_types().await,
        }
    }

    async fn create_work_type(&self, label: &str) -> Result<WorkType, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.create_work_type(label).await,
            ActiveStore::Local(local) => local.create_work_type(label).await,
        }
    }

    async fn delete_work_type(&self, id: &str) -> Result<(), StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.delete_work_type(id).await,
            ActiveStore::Local(local) => local.delete_work_type(id).await,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> SessionStore for ActiveStore<S> {
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.list_sessions().await,
            ActiveStore::Local(local) => local.list_sessions().await,
        }
    }

    async fn create_session(&self, session: NewStudySession) -> Result<StudySession, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.create_session(session).await,
            ActiveStore::Local(local) => local.create_session(session).await,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<S: Storage + Send + Sync> TaskStore for ActiveStore<S> {
    async fn list_tasks(&self, work_type_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.list_tasks(work_type_id).await,
            ActiveStore::Local(local) => local.list_tasks(work_type_id).await,
        }
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.create_task(task).await,
            ActiveStore::Local(local) => local.create_task(task).await,
        }
    }

    async fn update_task(&self, patch: TaskPatch) -> Result<Task, StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.update_task(patch).await,
            ActiveStore::Local(local) => local.update_task(patch).await,
        }
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        match self {
            ActiveStore::Remote(remote) => remote.delete_task(id).await,
            ActiveStore::Local(local) => local.delete_task(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStorage;

    fn remote() -> RemoteStore {
        RemoteStore::new("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn test_no_store_until_resolved() {
        assert!(ActiveStore::for_mode(&Mode::Pending, remote(), MemoryStorage::new()).is_none());
        assert!(
            ActiveStore::for_mode(&Mode::Redirect("/signin"), remote(), MemoryStorage::new())
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_guest_mode_writes_to_local_storage() {
        let storage = MemoryStorage::new();
        let store =
            ActiveStore::for_mode(&Mode::Active(Identity::Guest), remote(), storage.clone())
                .unwrap();
        assert!(store.is_guest());
        store.create_work_type("Reading").await.unwrap();

        let direct = LocalStore::new(storage);
        assert_eq!(direct.list_work_types().await.unwrap()[0].label, "Reading");
    }
}
