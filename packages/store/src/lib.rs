pub mod error;
pub mod local;
pub mod models;
pub mod repo;
pub mod storage;

mod file_store;
mod memory;
pub use file_store::FileStorage;
pub use memory::MemoryStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web_storage::WebStorage;

pub use error::StoreError;
pub use local::LocalStore;
pub use models::{NewStudySession, NewTask, StudySession, Task, TaskPatch, WorkType};
pub use repo::{SessionStore, Store, TaskStore, WorkTypeStore};
pub use storage::Storage;
