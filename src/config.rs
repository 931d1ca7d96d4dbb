//! Client configuration.

use std::path::PathBuf;

/// Backend used when no other base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://kirana-store-be.onrender.com/api/v1";

/// Session file used when no other path is configured, relative to the
/// working directory.
pub const DEFAULT_SESSION_FILE: &str = ".kirana/session.json";

/// Settings for reaching the backend and persisting the login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend API, up to and including the version prefix.
    pub base_url: String,

    /// Where the login session is stored between invocations.
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}
