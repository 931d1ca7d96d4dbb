//! Session store.
//!
//! One encapsulated object holding the bearer token and the logged-in user,
//! shared by the API client and the terminal commands. Set on login, cleared
//! on logout or on an unauthorized response. Backed by a JSON file so
//! separate invocations share one login.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::user::{AuthToken, User};

/// Errors related to session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read or written.
    #[error("could not access session file {path}: {source}")]
    Io {
        /// Path of the session file.
        path: PathBuf,

        /// Underlying filesystem error.
        source: io::Error,
    },

    /// The session could not be encoded for storage.
    #[error("could not encode the session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// An authenticated session: the bearer token plus the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for API requests.
    pub token: AuthToken,

    /// The logged-in account.
    pub user: User,
}

/// Shared session state backed by a JSON file.
///
/// Clones share the same in-memory state and file path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    state: Arc<Mutex<Option<Session>>>,
}

impl SessionStore {
    /// Open the store, loading any session persisted at `path`.
    ///
    /// A missing file means logged out; an unreadable or corrupt file is
    /// treated as logged out after a warning, since the user can simply log
    /// in again.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError::Io` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();

        let session = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Some(session),
                Err(error) => {
                    warn!(path = %path.display(), %error, "ignoring corrupt session file");
                    None
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        Ok(Self {
            path,
            state: Arc::new(Mutex::new(session)),
        })
    }

    /// Path of the backing session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.lock().as_ref().map(|session| session.token.clone())
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().map(|session| session.user.clone())
    }

    /// Check whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Replace the session and persist it to the session file.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the file cannot be written.
    pub fn store(&self, session: Session) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| SessionError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let encoded = serde_json::to_string_pretty(&session)?;

        fs::write(&self.path, encoded).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;

        *self.lock() = Some(session);

        Ok(())
    }

    /// Drop the session and remove the session file.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.lock() = None;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
