//! File-backed implementation of the session store.

use std::path::PathBuf;

use async_trait::async_trait;

use mlboard_core::error::{BoardError, Result};
use mlboard_core::session::{Session, SessionStore};

use crate::paths::{BoardPaths, PathError};
use crate::storage::AtomicJsonFile;

/// Persists the session as `session.json` under the config directory.
pub struct FileSessionStore {
    file: AtomicJsonFile<Session>,
}

impl FileSessionStore {
    /// Creates a store at the default location.
    pub fn new() -> std::result::Result<Self, PathError> {
        Ok(Self::with_path(BoardPaths::session_file()?))
    }

    /// Creates a store at an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<Session>> {
        self.file
            .load()
            .map_err(|e| BoardError::storage(e.to_string()))
    }

    async fn set(&self, session: &Session) -> Result<()> {
        self.file
            .save(session)
            .map_err(|e| BoardError::storage(e.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        self.file
            .remove()
            .map_err(|e| BoardError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlboard_core::session::UserProfile;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            token: "tok-abc".to_string(),
            user: UserProfile {
                user_name: "ada".to_string(),
                email: Some("ada@example.com".to_string()),
                full_name: None,
                token_type: Some("Bearer".to_string()),
                expiration: None,
            },
        }
    }

    #[tokio::test]
    async fn round_trips_and_clears() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::with_path(temp_dir.path().join("session.json"));

        assert!(store.get().await.unwrap().is_none());

        store.set(&session()).await.unwrap();
        let loaded = store.get().await.unwrap().unwrap();
        assert_eq!(loaded.token, "tok-abc");
        assert_eq!(loaded.user.user_name, "ada");

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }
}
