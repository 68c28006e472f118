//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                 | Default                          |
//! |--------------------------|----------------------------------|
//! | `KUD_HTTP_PORT`          | `8080`                           |
//! | `KUD_DB_PATH`            | `<platform data dir>/kud.db`     |
//! | `KUD_DB_MAX_CONNECTIONS` | `5`                              |
//! | `KUD_SEED_FIXTURES`      | `true`                           |

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const DB_FILE_NAME: &str = "kud.db";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Load the demo records on startup
    pub seed_fixtures: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str, default: &str| -> String {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(ServerConfig {
            http_port: value("KUD_HTTP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KUD_HTTP_PORT".to_string()))?,

            database_path: match lookup("KUD_DB_PATH").filter(|p| !p.trim().is_empty()) {
                Some(path) => PathBuf::from(path),
                None => default_database_path()?,
            },

            db_max_connections: value("KUD_DB_MAX_CONNECTIONS", "5")
                .parse()
                .ok()
                .filter(|&n: &u32| n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("KUD_DB_MAX_CONNECTIONS".to_string()))?,

            seed_fixtures: parse_flag(&value("KUD_SEED_FIXTURES", "true"))
                .ok_or_else(|| ConfigError::InvalidValue("KUD_SEED_FIXTURES".to_string()))?,
        })
    }

    /// `0.0.0.0:<port>`
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Platform data directory.
///
/// - **Linux**: `~/.local/share/kud-rukun-tani/kud.db`
/// - **macOS**: `~/Library/Application Support/id.kud.rukun-tani/kud.db`
/// - **Windows**: `%APPDATA%\kud\rukun-tani\data\kud.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("id", "kud", "rukun-tani")
        .ok_or_else(|| ConfigError::MissingRequired("KUD_DB_PATH".to_string()))?;
    Ok(dirs.data_dir().join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("KUD_DB_PATH", "/tmp/kud.db")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.db_max_connections, 5);
        assert!(config.seed_fixtures);
        assert_eq!(config.database_path, PathBuf::from("/tmp/kud.db"));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("KUD_HTTP_PORT", "3000"),
            ("KUD_DB_PATH", "/data/kud.db"),
            ("KUD_DB_MAX_CONNECTIONS", "2"),
            ("KUD_SEED_FIXTURES", "no"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.db_max_connections, 2);
        assert!(!config.seed_fixtures);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("KUD_DB_PATH", "x"), ("KUD_HTTP_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for KUD_HTTP_PORT");

        assert!(matches!(
            load(&[("KUD_DB_PATH", "x"), ("KUD_DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("KUD_DB_PATH", "x"), ("KUD_SEED_FIXTURES", "maybe")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
