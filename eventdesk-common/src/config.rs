//! Configuration loading and root folder resolution
//!
//! Priority order for every bootstrap value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "eventdesk.db";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "EVENTDESK_ROOT_FOLDER";

/// Bootstrap configuration loaded from TOML file
///
/// Cannot change while the service runs; restart to pick up edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on API requests (None disables the check)
    #[serde(default)]
    pub api_token: Option<String>,

    /// Offset of the operator's local clock from UTC, in minutes
    ///
    /// Used for calendar-day grouping and expense date stamps.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Device bridge configuration
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: default_bind_address(),
            port: default_port(),
            api_token: None,
            utc_offset_minutes: 0,
            logging: LoggingConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Device bridge (scanner / lighting / thermometer) endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the bridge, e.g. `http://192.168.1.84:5000`
    #[serde(default = "default_bridge_url")]
    pub base_url: String,

    /// Scan poll period while a session is active
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout against the bridge
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bridge_url() -> String {
    "http://192.168.1.84:5000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_request_timeout_ms() -> u64 {
    3000
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or the default location
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.bridge.poll_interval_ms == 0 {
            return Err(Error::Config(
                "bridge.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(Error::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

/// Default configuration file path for the platform
///
/// `<config_dir>/eventdesk/config.toml` (e.g. `~/.config/eventdesk/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eventdesk").join("config.toml"))
}

/// Root folder resolution
///
/// CLI argument, then `EVENTDESK_ROOT_FOLDER`, then the TOML `root_folder`,
/// then the OS data directory.
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("eventdesk"))
        .unwrap_or_else(|| PathBuf::from("./eventdesk_data"))
}

/// Database path inside a root folder, creating the folder if missing
pub fn prepare_database_path(root_folder: &Path) -> Result<PathBuf> {
    if !root_folder.exists() {
        std::fs::create_dir_all(root_folder)?;
        info!("Created root folder: {}", root_folder.display());
    }
    Ok(root_folder.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, 5780);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bridge.poll_interval_ms, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = TomlConfig::from_toml_str("[bridge]\npoll_interval_ms = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_prepare_database_path_creates_folder() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("nested").join("root");
        let db_path = prepare_database_path(&root).unwrap();
        assert!(root.exists());
        assert_eq!(db_path, root.join(DATABASE_FILE_NAME));
    }
}
