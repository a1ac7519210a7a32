//! Session store: the persisted bearer token and its companions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read synchronously at startup to decide whether restoration is needed, and
//! by the HTTP adapter on every authenticated request. Writes are
//! crate-private; the auth manager is the only writer.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::storage::{FileStorage, MemoryStorage, Storage};

/// Storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the id used to fetch the current user.
pub const USER_ID_KEY: &str = "userId";
/// Storage key holding the refresh token, when the server issued one.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Cheap-to-clone handle over the injected [`Storage`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    /// Current bearer token, if any. Blank values count as absent.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.read(USER_ID_KEY)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    pub(crate) fn set_token(&self, token: &str) {
        self.storage.set(ACCESS_TOKEN_KEY, token);
    }

    pub(crate) fn set_user_id(&self, user_id: &str) {
        self.storage.set(USER_ID_KEY, user_id);
    }

    /// Store or drop the refresh token. `None` removes a stale one.
    pub(crate) fn set_refresh_token(&self, refresh_token: Option<&str>) {
        match refresh_token {
            Some(token) => self.storage.set(REFRESH_TOKEN_KEY, token),
            None => self.storage.remove(REFRESH_TOKEN_KEY),
        }
    }

    /// Remove every session key.
    pub(crate) fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(USER_ID_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").field("has_session", &self.has_session()).finish()
    }
}
