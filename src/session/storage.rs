//! Synchronous key-value storage backing the session store.
//!
//! DESIGN
//! ======
//! Mirrors browser `localStorage` semantics: string keys, string values,
//! synchronous access, best-effort writes. Failures to persist are logged and
//! swallowed so a broken medium degrades to "no session" instead of blocking
//! startup.

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Origin-scoped persistent key-value storage.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Delete `key`. Deleting an absent key is a no-op.
    fn remove(&self, key: &str);
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Storage persisted as a flat JSON object in a single file.
///
/// Every call re-reads the file so separate processes sharing the path see
/// each other's writes. Writes go to a sibling temp file that is renamed into
/// place, so a reader sees either the old map or the new one. The file holds a
/// bearer token and is owner-only (0600) on unix.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt; ignoring");
                BTreeMap::new()
            }
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "session dir create failed");
                return;
            }
        }
        let raw = match serde_json::to_string_pretty(items) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "session encode failed");
                return;
            }
        };
        if let Err(e) = write_atomic(&self.path, raw.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "session file write failed");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load();
        apply(&mut items);
        self.save(&items);
    }
}

/// Replace `path` with `data` via temp file + rename.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().map_or_else(|| OsString::from("session"), OsString::from);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&tmp_path)?;
    #[cfg(unix)]
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp_path, path).inspect_err(|_| {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            tracing::debug!(path = %tmp_path.display(), error = %e, "temp session file not removed");
        }
    })
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|items| {
            items.insert(key.to_owned(), value.to_owned());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|items| {
            items.remove(key);
        });
    }
}
