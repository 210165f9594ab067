//! Persisted access/refresh token storage.
//!
//! The store is the cookie-equivalent of the browser client: opaque string
//! values with independent expirations, surviving process restarts within
//! their TTL. Operations are best-effort and silent; persistence failures are
//! logged and never propagated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

pub trait TokenStore: Send + Sync {
    /// Current, non-expired value for `kind`, if any.
    fn get(&self, kind: TokenKind) -> Option<String>;
    fn set(&self, kind: TokenKind, value: &str, ttl: Duration);
    fn remove(&self, kind: TokenKind);

    fn clear(&self) {
        self.remove(TokenKind::Access);
        self.remove(TokenKind::Refresh);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<&'static str, StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let entries = self.entries.lock().expect("token store lock poisoned");
        entries
            .get(kind.key())
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn set(&self, kind: TokenKind, value: &str, ttl: Duration) {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        entries.insert(
            kind.key(),
            StoredToken {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
    }

    fn remove(&self, kind: TokenKind) {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        entries.remove(kind.key());
    }
}

/// File-backed store persisting tokens as a small JSON document.
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, StoredToken>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load token store, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, StoredToken>) {
        if let Err(e) = write_entries(&self.path, entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist token store");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let entries = self.entries.lock().expect("token store lock poisoned");
        entries
            .get(kind.key())
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn set(&self, kind: TokenKind, value: &str, ttl: Duration) {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        entries.insert(
            kind.key().to_string(),
            StoredToken {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        self.persist(&entries);
    }

    fn remove(&self, kind: TokenKind) {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        if entries.remove(kind.key()).is_some() {
            self.persist(&entries);
        }
    }
}

fn load_entries(path: &Path) -> anyhow::Result<HashMap<String, StoredToken>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let mut entries: HashMap<String, StoredToken> = serde_json::from_str(&raw)?;
    entries.retain(|_, entry| !entry.is_expired());
    Ok(entries)
}

fn write_entries(path: &Path, entries: &HashMap<String, StoredToken>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(TokenKind::Access), None);

        store.set(TokenKind::Access, "abc", Duration::days(1));
        assert_eq!(store.get(TokenKind::Access), Some("abc".to_string()));

        store.remove(TokenKind::Access);
        assert_eq!(store.get(TokenKind::Access), None);
    }

    #[test]
    fn expired_tokens_read_as_absent() {
        let store = MemoryTokenStore::new();
        store.set(TokenKind::Refresh, "stale", Duration::seconds(-1));
        assert_eq!(store.get(TokenKind::Refresh), None);
    }

    #[test]
    fn clear_removes_both_kinds() {
        let store = MemoryTokenStore::new();
        store.set(TokenKind::Access, "a", Duration::days(1));
        store.set(TokenKind::Refresh, "r", Duration::days(7));

        store.clear();

        assert_eq!(store.get(TokenKind::Access), None);
        assert_eq!(store.get(TokenKind::Refresh), None);
    }

    #[test]
    fn file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(&path);
        store.set(TokenKind::Access, "persisted", Duration::days(1));
        store.set(TokenKind::Refresh, "longer", Duration::days(7));
        drop(store);

        let reloaded = FileTokenStore::new(&path);
        assert_eq!(
            reloaded.get(TokenKind::Access),
            Some("persisted".to_string())
        );
        assert_eq!(reloaded.get(TokenKind::Refresh), Some("longer".to_string()));
    }

    #[test]
    fn file_store_drops_expired_entries_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(&path);
        store.set(TokenKind::Access, "gone", Duration::seconds(-5));
        drop(store);

        let reloaded = FileTokenStore::new(&path);
        assert_eq!(reloaded.get(TokenKind::Access), None);
    }

    #[test]
    fn file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(TokenKind::Access), None);

        store.set(TokenKind::Access, "fresh", Duration::days(1));
        assert_eq!(store.get(TokenKind::Access), Some("fresh".to_string()));
    }
}
