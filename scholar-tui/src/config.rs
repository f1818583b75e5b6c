//! Configuration loading for the Scholar dashboard.
//!
//! All fields are required unless explicitly marked optional.

use scholar_client::{config_path, BandThresholds, ClientConfig, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub client: ClientConfig,
    pub refresh_interval_ms: u64,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    #[serde(default)]
    pub log_format: LogFormat,
    pub theme: ThemeConfig,
    #[serde(default)]
    pub bands: BandThresholds,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: TuiConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.theme.name.eq_ignore_ascii_case("scholar") {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'scholar' is supported".to_string(),
            });
        }
        if !self.bands.is_valid() {
            return Err(ConfigError::InvalidValue {
                field: "bands",
                reason: "ok must be <= strong".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
refresh_interval_ms = 1000
persistence_path = "state/ui.json"
log_path = "state/scholar.log"

[client]
api_base_url = "http://localhost:3000/api"
request_timeout_ms = 10000
session_path = "state/session.json"

[theme]
name = "scholar"
"#;

    #[test]
    fn parses_with_defaults() {
        let config: TuiConfig = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.bands, BandThresholds::default());
        assert_eq!(config.client.upload_timeout_ms, 1_200_000);
    }

    #[test]
    fn rejects_unknown_fields() {
        let with_extra = format!("{SAMPLE}\n[extra]\nkey = 1\n");
        assert!(toml::from_str::<TuiConfig>(&with_extra).is_err());
    }

    #[test]
    fn rejects_inverted_bands() {
        let mut config: TuiConfig = toml::from_str(SAMPLE).unwrap();
        config.bands = BandThresholds {
            strong: 40.0,
            ok: 60.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "bands", .. })
        ));
    }
}
