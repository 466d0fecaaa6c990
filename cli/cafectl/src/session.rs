//! Session store.
//!
//! The session (bearer token + username) is the only authority for whether
//! the console is authenticated. Reads always go to the storage backend so
//! a login or logout from another process is observed on the next read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{self, write_private};

/// Errors raised by session storage backends.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path:?} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine session location: {0}")]
    Location(String),
}

/// Persisted session record.
///
/// Serialized with the keys `token` and `username`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Durable storage for the session record.
pub trait SessionStorage: Send + Sync {
    /// Read the current record; an absent record is an empty session.
    fn load(&self) -> Result<StoredSession, SessionError>;

    /// Replace the record in a single write.
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;

    /// Remove the record.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session persisted as a private JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default location in the user's config directory.
    pub fn default_location() -> Result<Self, SessionError> {
        config::default_session_path()
            .map(Self::new)
            .map_err(|e| SessionError::Location(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<StoredSession, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSession::default())
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&contents).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_vec_pretty(session).map_err(|source| {
            SessionError::Format {
                path: self.path.clone(),
                source,
            }
        })?;

        write_private(&self.path, &contents).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<StoredSession>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self) -> std::sync::MutexGuard<'_, StoredSession> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<StoredSession, SessionError> {
        Ok(self.record().clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.record() = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.record() = StoredSession::default();
        Ok(())
    }
}

/// Handle to the process-wide session.
///
/// Clones share the same storage backend.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn SessionStorage>,
}

impl Session {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Session backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Session backed by a file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    /// Persist a new token and username together.
    pub fn set_session(
        &self,
        token: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<(), SessionError> {
        let record = StoredSession {
            token: Some(token.into()),
            username: Some(username.into()),
        };
        self.storage.save(&record)?;
        debug!(username = ?record.username, "session stored");
        Ok(())
    }

    /// Remove both token and username.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        self.storage.clear()?;
        debug!("session cleared");
        Ok(())
    }

    fn current(&self) -> StoredSession {
        match self.storage.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "failed to read session, treating as signed out");
                StoredSession::default()
            }
        }
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.current().token.filter(|t| !t.is_empty())
    }

    /// Username stored with the current session, if any.
    pub fn username(&self) -> Option<String> {
        self.current().username
    }

    /// True iff a non-empty token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_set_and_clear() {
        let session = Session::in_memory();
        session.set_session("abc", "admin").unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.username().as_deref(), Some("admin"));

        session.clear_session().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = Session::in_memory();
        session.set_session("", "admin").unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let session = Session::in_memory();
        let other = session.clone();

        session.set_session("abc", "admin").unwrap();
        assert!(other.is_authenticated());

        other.clear_session().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_file_storage_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        Session::file(&path).set_session("abc", "admin").unwrap();

        let reloaded = Session::file(&path);
        assert_eq!(reloaded.token().as_deref(), Some("abc"));
        assert_eq!(reloaded.username().as_deref(), Some("admin"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"token": "abc", "username": "admin"}));
    }

    #[test]
    fn test_file_storage_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::file(dir.path().join("session.json"));

        session.clear_session().unwrap();
        session.set_session("abc", "admin").unwrap();
        session.clear_session().unwrap();
        session.clear_session().unwrap();

        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.load(), Err(SessionError::Format { .. })));
        assert!(!Session::file(&path).is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        Session::file(&path).set_session("abc", "admin").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
