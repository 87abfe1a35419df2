//! Client configuration.
//!
//! Settings are read from the environment in one place so call sites never
//! touch `env::var()` directly.

use std::path::PathBuf;

/// Backend used when `MYFLIX_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://myflix-movieapi.onrender.com/";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the myFlix REST API (default: [`DEFAULT_API_URL`])
    pub api_url: String,
    /// File backing the session store. `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `MYFLIX_API_URL` and `MYFLIX_SESSION_FILE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("MYFLIX_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: non_empty("MYFLIX_SESSION_FILE").map(PathBuf::from),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn session_file(&self) -> Option<&PathBuf> {
        self.session_file.as_ref()
    }
}
