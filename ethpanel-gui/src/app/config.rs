use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::filter;

use crate::code::ScanConfig;

pub const DEFAULT_FILE_NAME: &str = "gui.toml";

/// Size in pixels of a cell of the receive QR code.
pub const DEFAULT_QR_CELL_SIZE: u16 = 6;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// log level, can be "info", "debug", "trace".
    pub log_level: Option<String>,
    /// Log at debug level if true and no log level is set.
    pub debug: Option<bool>,
    /// JSON-RPC endpoint of the wallet provider.
    pub provider_url: Option<String>,
    #[serde(default = "default_qr_cell_size")]
    pub qr_cell_size: u16,
    #[serde(default)]
    pub scanner: ScanConfig,
}

fn default_qr_cell_size() -> u16 {
    DEFAULT_QR_CELL_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            debug: None,
            provider_url: None,
            qr_cell_size: DEFAULT_QR_CELL_SIZE,
            scanner: ScanConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = std::fs::read_to_string(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::NotFound,
                _ => ConfigError::ReadingFile(format!("Reading configuration file: {}", e)),
            })
            .and_then(|file_content| {
                toml::from_str::<Config>(&file_content).map_err(|e| {
                    ConfigError::ReadingFile(format!("Parsing configuration file: {}", e))
                })
            })?;

        // check if log_level field is valid
        config.log_level()?;
        if config.qr_cell_size == 0 {
            return Err(ConfigError::InvalidField(
                "qr_cell_size",
                "must be greater than 0".to_string(),
            ));
        }
        if config.scanner.fps == 0 {
            return Err(ConfigError::InvalidField(
                "scanner.fps",
                "must be greater than 0".to_string(),
            ));
        }
        Ok(config)
    }

    /// Returns the default configuration if the file does not exist.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::NotFound) => Ok(Self::default()),
            res => res,
        }
    }

    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string(&self)
            .map_err(|e| ConfigError::WritingFile(format!("Failed to serialize config: {}", e)))?;

        let mut config_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| ConfigError::WritingFile(e.to_string()))?;

        config_file.write_all(content.as_bytes()).map_err(|e| {
            tracing::warn!("failed to write to file: {:?}", e);
            ConfigError::WritingFile(e.to_string())
        })?;

        tracing::info!("Done writing gui configuration file");
        Ok(())
    }

    pub fn log_level(&self) -> Result<filter::LevelFilter, ConfigError> {
        if let Some(level) = &self.log_level {
            match level.as_ref() {
                "info" => Ok(filter::LevelFilter::INFO),
                "debug" => Ok(filter::LevelFilter::DEBUG),
                "trace" => Ok(filter::LevelFilter::TRACE),
                _ => Err(ConfigError::InvalidField(
                    "log_level",
                    format!("Unknown value '{}'", level),
                )),
            }
        } else if let Some(true) = self.debug {
            Ok(filter::LevelFilter::DEBUG)
        } else {
            Ok(filter::LevelFilter::INFO)
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ConfigError {
    InvalidField(&'static str, String),
    NotFound,
    ReadingFile(String),
    WritingFile(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Config file not found"),
            Self::InvalidField(field, message) => {
                write!(f, "Config field {} is invalid: {}", field, message)
            }
            Self::ReadingFile(e) => write!(f, "Error while reading file: {}", e),
            Self::WritingFile(e) => write!(f, "Error while writing file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_FILE_NAME);

        assert_eq!(Config::from_file(&path), Err(ConfigError::NotFound));
        assert_eq!(Config::from_file_or_default(&path), Ok(Config::default()));

        std::fs::write(
            &path,
            r#"
log_level = "debug"
provider_url = "http://127.0.0.1:1248"

[scanner]
fps = 5
"#,
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_level(), Ok(filter::LevelFilter::DEBUG));
        assert_eq!(
            config.provider_url.as_deref(),
            Some("http://127.0.0.1:1248")
        );
        assert_eq!(config.qr_cell_size, DEFAULT_QR_CELL_SIZE);
        assert_eq!(config.scanner, ScanConfig { fps: 5, qrbox: 250 });

        std::fs::write(&path, "log_level = \"verbose\"\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidField("log_level", _))
        ));

        std::fs::write(&path, "qr_cell_size = 0\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidField("qr_cell_size", _))
        ));

        std::fs::write(&path, "provider_url = [").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ReadingFile(_))
        ));
    }

    #[test]
    fn config_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_FILE_NAME);
        let config = Config {
            debug: Some(true),
            provider_url: Some("http://localhost:8545".to_string()),
            ..Config::default()
        };
        config.to_file(&path).unwrap();
        let read = Config::from_file(&path).unwrap();
        assert_eq!(read, config);
        assert_eq!(read.log_level(), Ok(filter::LevelFilter::DEBUG));
    }
}
