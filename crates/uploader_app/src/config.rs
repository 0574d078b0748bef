use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use uploader_engine::FetchSettings;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "uploader.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid log level {0:?}")]
    LogLevel(String),
    #[error("invalid status_base_url {0:?}")]
    BaseUrl(String),
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogDestination {
    /// Append to the configured `log_file`.
    File,
    /// Write to the terminal.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Status endpoint base; the result page origin when absent.
    pub status_base_url: Option<String>,
    /// Directory holding the saved form draft.
    pub storage_dir: PathBuf,
    /// Named text fields of the upload form.
    pub form_fields: Vec<String>,
    pub log_destination: LogDestination,
    /// Used when `log_destination` is `File` or `Both`.
    pub log_file: PathBuf,
    pub log_level: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            status_base_url: None,
            storage_dir: PathBuf::from(".uploader"),
            // Credential fields stay out of the plaintext draft.
            form_fields: ["album_id", "group_id", "description"]
                .into_iter()
                .map(String::from)
                .collect(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("uploader.log"),
            log_level: "warn".to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_response_bytes: FetchSettings::default().max_bytes,
        }
    }
}

impl AppConfig {
    /// Reads a RON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn status_base(&self) -> Result<Option<Url>, ConfigError> {
        self.status_base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|_| ConfigError::BaseUrl(raw.to_string())))
            .transpose()
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_bytes: self.max_response_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.level().unwrap(), LevelFilter::Warn);
        assert_eq!(config.fetch_settings().request_timeout, None);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config = AppConfig::parse(
            r#"(
                status_base_url: Some("https://uploader.example/"),
                log_destination: Both,
                log_level: "debug",
                request_timeout_secs: Some(15),
            )"#,
        )
        .unwrap();

        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.level().unwrap(), LevelFilter::Debug);
        assert_eq!(
            config.status_base().unwrap().unwrap().as_str(),
            "https://uploader.example/"
        );
        assert_eq!(
            config.fetch_settings().request_timeout,
            Some(Duration::from_secs(15))
        );
        assert_eq!(config.storage_dir, PathBuf::from(".uploader"));
        assert_eq!(config.log_file, PathBuf::from("uploader.log"));
    }

    #[test]
    fn log_file_can_be_moved() {
        let config = AppConfig::parse(r#"(log_destination: File, log_file: "/var/log/uploader.log")"#)
            .unwrap();
        assert_eq!(config.log_destination, LogDestination::File);
        assert_eq!(config.log_file, PathBuf::from("/var/log/uploader.log"));
    }

    #[test]
    fn default_form_fields_hold_no_credentials() {
        let config = AppConfig::default();
        assert_eq!(config.form_fields, ["album_id", "group_id", "description"]);
        for name in &config.form_fields {
            let lower = name.to_ascii_lowercase();
            assert!(
                !["token", "secret", "password"].iter().any(|s| lower.contains(s)),
                "{name} would be saved in plaintext"
            );
        }
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("uploader.ron");
        fs::write(&path, "(log_level: )").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn bad_values_are_reported() {
        let config = AppConfig {
            log_level: "loud".into(),
            status_base_url: Some("not a url".into()),
            ..AppConfig::default()
        };
        assert!(matches!(config.level(), Err(ConfigError::LogLevel(_))));
        assert!(matches!(config.status_base(), Err(ConfigError::BaseUrl(_))));
    }
}
