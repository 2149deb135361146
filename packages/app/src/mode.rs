//! # Identity mode: signed in, guest, or neither
//!
//! Resolved once per page load from the server's session status and the
//! `guestMode` flag in local storage. The result decides which store every
//! other component talks to for the rest of the page's life; changing identity
//! means resolving again.

use api::{RemoteStore, UserInfo};
use store::storage::GUEST_MODE_KEY;
use store::{Storage, StoreError};
use tracing::{debug, warn};

pub const SIGN_IN_PATH: &str = "/signin";

/// What the server says about the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Authenticated(UserInfo),
    Unauthenticated,
}

impl SessionStatus {
    /// Ask the server. Failing to reach it counts as unauthenticated.
    pub async fn fetch(remote: &RemoteStore) -> Self {
        match remote.current_user().await {
            Ok(Some(user)) => SessionStatus::Authenticated(user),
            Ok(None) => SessionStatus::Unauthenticated,
            Err(e) => {
                warn!("session check failed: {}", e);
                SessionStatus::Unauthenticated
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    User(UserInfo),
    Guest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Session status not known yet; no store is active.
    Pending,
    Redirect(&'static str),
    Active(Identity),
}

pub fn is_guest<S: Storage>(storage: &S) -> Result<bool, StoreError> {
    Ok(storage.get_item(GUEST_MODE_KEY)?.as_deref() == Some("true"))
}

pub fn enter_guest_mode<S: Storage>(storage: &S) -> Result<(), StoreError> {
    debug!("entering guest mode");
    storage.set_item(GUEST_MODE_KEY, "true")
}

/// Clears the guest flag, e.g. when a guest chooses to sign in.
pub fn leave_guest_mode<S: Storage>(storage: &S) -> Result<(), StoreError> {
    storage.remove_item(GUEST_MODE_KEY)
}

/// A signed-in session always wins and clears a stale guest flag.
pub fn resolve<S: Storage>(status: &SessionStatus, storage: &S) -> Result<Mode, StoreError> {
    match status {
        SessionStatus::Loading => Ok(Mode::Pending),
        SessionStatus::Authenticated(user) => {
            leave_guest_mode(storage)?;
            Ok(Mode::Active(Identity::User(user.clone())))
        }
        SessionStatus::Unauthenticated if is_guest(storage)? => Ok(Mode::Active(Identity::Guest)),
        SessionStatus::Unauthenticated => Ok(Mode::Redirect(SIGN_IN_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStorage;

    fn ada() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            name: None,
        }
    }

    #[test]
    fn test_unauthenticated_without_flag_redirects() {
        let storage = MemoryStorage::new();
        let mode = resolve(&SessionStatus::Unauthenticated, &storage).unwrap();
        assert_eq!(mode, Mode::Redirect("/signin"));
    }

    #[test]
    fn test_guest_flag_activates_guest_mode() {
        let storage = MemoryStorage::new();
        enter_guest_mode(&storage).unwrap();
        let mode = resolve(&SessionStatus::Unauthenticated, &storage).unwrap();
        assert_eq!(mode, Mode::Active(Identity::Guest));

        leave_guest_mode(&storage).unwrap();
        assert!(!is_guest(&storage).unwrap());
    }

    #[test]
    fn test_authenticated_clears_guest_flag() {
        let storage = MemoryStorage::new();
        enter_guest_mode(&storage).unwrap();
        let mode = resolve(&SessionStatus::Authenticated(ada()), &storage).unwrap();
        assert_eq!(mode, Mode::Active(Identity::User(ada())));
        assert!(!is_guest(&storage).unwrap());
    }

    #[test]
    fn test_loading_is_pending() {
        let storage = MemoryStorage::new();
        enter_guest_mode(&storage).unwrap();
        assert_eq!(
            resolve(&SessionStatus::Loading, &storage).unwrap(),
            Mode::Pending
        );
    }
}
