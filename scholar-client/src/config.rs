//! Client configuration.
//!
//! All fields are required except `upload_timeout_ms`, which defaults to the
//! twenty minutes the server may spend analysing a curriculum PDF.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 20 * 60 * 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    #[serde(default = "default_upload_timeout_ms")]
    pub upload_timeout_ms: u64,
    /// Key-value file holding the persisted session.
    pub session_path: PathBuf,
}

fn default_upload_timeout_ms() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_MS
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or SCHOLAR_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.upload_timeout_ms < self.request_timeout_ms {
            return Err(ConfigError::InvalidValue {
                field: "upload_timeout_ms",
                reason: "must be >= request_timeout_ms".to_string(),
            });
        }
        if self.session_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// `--config <path>` wins over `SCHOLAR_CONFIG`.
pub fn config_path() -> Option<PathBuf> {
    config_path_from_args().or_else(config_path_from_env)
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("SCHOLAR_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ClientConfig {
        ClientConfig {
            api_base_url: "http://localhost:3000/api".into(),
            request_timeout_ms: 5_000,
            upload_timeout_ms: DEFAULT_UPLOAD_TIMEOUT_MS,
            session_path: PathBuf::from("session.json"),
        }
    }

    #[test]
    fn upload_timeout_defaults_to_twenty_minutes() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_base_url = "https://scholar.example/api"
            request_timeout_ms = 10000
            session_path = "/tmp/scholar-session.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.upload_timeout_ms, 1_200_000);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<ClientConfig>(
            r#"
            api_base_url = "https://scholar.example/api"
            request_timeout_ms = 10000
            session_path = "s.json"
            retries = 3
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn validate_names_the_offending_field() {
        let mut config = base();
        config.request_timeout_ms = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "request_timeout_ms"),
            other => panic!("unexpected: {other:?}"),
        }

        let mut config = base();
        config.api_base_url = "localhost:3000".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "api_base_url", .. })
        ));

        let mut config = base();
        config.upload_timeout_ms = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "upload_timeout_ms", .. })
        ));
    }
}
