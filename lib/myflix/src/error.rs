use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MyFlixError>;

/// A single field-level complaint from the backend's validator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    #[serde(alias = "message")]
    pub msg: String,
    #[serde(alias = "param", default)]
    pub path: Option<String>,
}

#[derive(Debug, Error)]
pub enum MyFlixError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base url cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("no session token available")]
    NotAuthenticated,

    #[error("login failed")]
    AuthenticationFailed,

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("validation failed: {message}")]
    Validation {
        errors: Vec<FieldError>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response ({status}): {message}")]
    Decode { status: u16, message: String },

    #[error("no active session")]
    NoSession,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MyFlixError {
    /// Text suitable for a transient notification.
    ///
    /// Field errors are joined with `", "`; otherwise the backend's own message
    /// is preferred over a generic description.
    pub fn user_message(&self) -> String {
        match self {
            MyFlixError::Validation { errors, message } if errors.is_empty() => message.clone(),
            MyFlixError::Validation { errors, .. } => errors
                .iter()
                .map(|e| e.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            MyFlixError::Unauthorized { message }
            | MyFlixError::NotFound { message }
            | MyFlixError::Conflict { message }
            | MyFlixError::Api { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            MyFlixError::Api { status, .. } => format!("The server returned an error ({status})"),
            MyFlixError::Transport(_) => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            MyFlixError::Unauthorized { .. } | MyFlixError::NotAuthenticated
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MyFlixError::NotFound { .. })
    }
}
