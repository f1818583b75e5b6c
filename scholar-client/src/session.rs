//! The signed-in session: one process-wide service, persisted between runs.
//!
//! The session is written only by login, logout and the facade's 401
//! handling. Everything else reads it, and the front-end subscribes to it so
//! a teardown anywhere sends the user back to the login view.

use scholar_core::{LoginResponse, SessionUser};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Fixed key the session is stored under.
pub const SESSION_KEY: &str = "scholar.session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String key-value storage backing the session.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// JSON object on disk, one entry per key.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Volatile store for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Shared handle to the current session. Cheap to clone.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    current: Arc<watch::Sender<Option<Session>>>,
}

impl SessionService {
    /// Restore any persisted session. An unreadable entry is dropped rather
    /// than failing startup.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let restored = match store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable persisted session");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session store");
                None
            }
        };
        let (tx, _rx) = watch::channel(restored);
        Self {
            store,
            current: Arc::new(tx),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    pub fn get(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Persist and publish a new session.
    pub fn set(&self, session: Session) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&session)?;
        self.store.set(SESSION_KEY, &raw)?;
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "session started");
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Drop the session. Subscribers are notified even if the store fails.
    pub fn clear(&self) -> Result<(), SessionError> {
        let previous = self.current.send_replace(None);
        if previous.is_some() {
            tracing::info!("session cleared");
        }
        self.store.remove(SESSION_KEY)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_core::{Role, UserId};

    fn session() -> Session {
        Session {
            token: "tok-1".into(),
            user: SessionUser {
                id: UserId::from("u1"),
                role: Role::Teacher,
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: Some("grace@school.test".into()),
            },
        }
    }

    #[test]
    fn file_store_round_trips_under_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let service = SessionService::from_file(&path);
        assert!(service.get().is_none());
        service.set(session()).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.contains_key(SESSION_KEY));

        let restored = SessionService::from_file(&path);
        assert_eq!(restored.get(), Some(session()));
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn clear_removes_persisted_entry_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let service = SessionService::from_file(&path);
        service.set(session()).unwrap();

        let mut rx = service.subscribe();
        service.clear().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(SessionService::from_file(&path).get().is_none());
    }

    #[test]
    fn corrupt_entry_starts_signed_out() {
        let store = Arc::new(MemoryStore::default());
        store.set(SESSION_KEY, "{not json").unwrap();
        let service = SessionService::new(store);
        assert!(!service.is_authenticated());
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("kv.json"));
        store.set("theme", "dark").unwrap();
        store.set(SESSION_KEY, "x").unwrap();
        store.remove(SESSION_KEY).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }
}
