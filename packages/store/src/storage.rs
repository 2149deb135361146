//! # Key/value storage: the browser-local persistence seam
//!
//! Guest mode keeps everything in a flat string-to-string map, the shape of the
//! browser's `localStorage`. [`Storage`] abstracts that map so the same
//! [`crate::LocalStore`] logic runs against:
//!
//! - [`crate::MemoryStorage`]: tests and throwaway sessions
//! - [`crate::FileStorage`]: native builds, one file per key under a data directory
//! - `WebStorage`: `window.localStorage` on wasm (`web` feature)
//!
//! Each record collection is stored as one JSON array under a fixed key; the guest
//! flag is the literal string `"true"`. There is no schema version.

use crate::error::StoreError;

pub const WORK_TYPES_KEY: &str = "workTypes";
pub const STUDY_SESSIONS_KEY: &str = "studySessions";
pub const TASKS_KEY: &str = "tasks";
pub const GUEST_MODE_KEY: &str = "guestMode";

/// Synchronous string key/value storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}
