//! Platform guest-mode storage.
//!
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::WebStorage`]
//! - **Desktop / Mobile** (native): one file per key under `<data_dir>/studyflow/`

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn default_storage() -> store::WebStorage {
    store::WebStorage::new()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> store::FileStorage {
    let base = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("studyflow");
    store::FileStorage::new(base)
}
