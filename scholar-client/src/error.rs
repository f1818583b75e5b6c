//! Error types for the Scholar client.
//!
//! [`ApiClientError`] is what the facade returns. Cache entries cannot hold it
//! (`reqwest::Error` is not `Clone`), so queries store a [`QueryError`]
//! snapshot instead.

use std::fmt;

/// Errors returned by [`crate::ApiClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server rejected the bearer token. The session has been cleared.
    #[error("Session expired, please sign in again")]
    Unauthorized,
    /// 4xx with a `message` from the server.
    #[error("{message}")]
    Validation { status: u16, message: String },
    /// 4xx without a usable message.
    #[error("Request rejected (HTTP {status})")]
    Rejected { status: u16 },
    /// 5xx. The server message is kept for logs only.
    #[error("Server error (HTTP {status})")]
    Server { status: u16, message: Option<String> },
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    /// HTTP status for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Validation { status, .. }
            | Self::Rejected { status }
            | Self::Server { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server message safe to show verbatim, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Validation { .. } | Self::Rejected { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::Decode(_) | Self::Unsupported(_) | Self::Config(_) => ErrorKind::Client,
        }
    }

    /// Message suitable for an error panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) if err.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            Self::Transport(_) => "Could not reach the server".to_string(),
            Self::Server { .. } => "Something went wrong on the server".to_string(),
            other => other.to_string(),
        }
    }
}

/// Coarse classification used for rendering and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Unauthorized,
    Validation,
    Server,
    Client,
}

/// Cloneable error snapshot stored in query cache entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: ErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether offering a retry makes sense.
    pub fn retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport | ErrorKind::Server)
    }
}

impl From<&ApiClientError> for QueryError {
    fn from(err: &ApiClientError) -> Self {
        Self::new(err.kind(), err.user_message())
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_verbatim() {
        let err = ApiClientError::Validation {
            status: 409,
            message: "Email already in use".into(),
        };
        assert_eq!(err.user_message(), "Email already in use");
        assert_eq!(err.server_message(), Some("Email already in use"));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn server_errors_hide_details() {
        let err = ApiClientError::Server {
            status: 500,
            message: Some("stack trace".into()),
        };
        let snapshot = QueryError::from(&err);
        assert_eq!(snapshot.kind, ErrorKind::Server);
        assert!(!snapshot.message.contains("stack trace"));
        assert!(snapshot.retryable());
    }

    #[test]
    fn unauthorized_is_not_retryable() {
        let snapshot = QueryError::from(&ApiClientError::Unauthorized);
        assert_eq!(snapshot.kind, ErrorKind::Unauthorized);
        assert!(!snapshot.retryable());
    }
}
