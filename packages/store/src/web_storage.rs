//! # Browser `localStorage`: guest-mode persistence on the web
//!
//! [`WebStorage`] is the [`Storage`] implementation used on the **web platform**.
//! It reads and writes `window.localStorage` through `web-sys`.
//!
//! ## Connection management
//!
//! `WebStorage` is a zero-size struct that looks up `window.localStorage` on every
//! call. `web_sys::Storage` is not `Send`, so holding it would pin the store to one
//! thread; the lookup is a cheap property read.
//!
//! ## Error handling
//!
//! A missing window (workers, SSR) or a disabled storage area reports
//! [`StoreError::Storage`]. Quota errors on `setItem` surface the same way.

use crate::error::StoreError;
use crate::storage::Storage;

#[derive(Clone, Copy, Debug, Default)]
pub struct WebStorage;

impl WebStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage(&self) -> Result<web_sys::Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Storage("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StoreError::Storage(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Storage("localStorage unavailable".to_string()))
    }
}

impl Storage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.local_storage()?
            .get_item(key)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.local_storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.local_storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }
}
