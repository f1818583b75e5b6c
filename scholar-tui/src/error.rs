//! Error types for the TUI.

use crate::persistence::PersistenceError;
use scholar_client::{ApiClientError, ConfigError, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Failed to install log subscriber: {0}")]
    Telemetry(String),
}
