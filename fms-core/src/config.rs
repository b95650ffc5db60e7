//! Configuration management

use crate::error::{ErrorContext, FmsError, FmsResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base URL of the feedback service as deployed behind the default Tomcat context
pub const DEFAULT_API_URL: &str = "http://localhost:8090/feedback_management";

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FmsConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
            user_agent: format!("fms/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted session and cached feedback
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("fms"))
            .unwrap_or_else(|| PathBuf::from(".fms"));
        Self { data_dir }
    }
}

/// Where the admin dashboard reads its feedback list from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSourceKind {
    /// Live list from the remote API, deletes go to the server
    #[default]
    Api,
    /// List persisted locally under the `feedbacks` key, deletes only touch that copy
    LocalCache,
}

impl std::str::FromStr for FeedbackSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "api" => Ok(FeedbackSourceKind::Api),
            "local_cache" | "local" => Ok(FeedbackSourceKind::LocalCache),
            _ => Err(format!("Unknown feedback source: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub source: FeedbackSourceKind,
}

impl FmsConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FmsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FmsError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: FmsConfig = toml::from_str(&content).map_err(|e| FmsError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> FmsResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| FmsError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| FmsError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Candidate locations, most specific first
    pub fn default_locations() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("fms").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".fms").join("config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from an explicit path, else the first existing default location, else defaults.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> FmsResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => match Self::default_locations().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    info!("Loading configuration from {:?}", path);
                    Self::from_file(path)?
                }
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `FMS_API_URL`, `FMS_DATA_DIR` and `FMS_ADMIN_SOURCE`
    pub fn apply_env_overrides(&mut self) -> FmsResult<()> {
        if let Ok(url) = std::env::var("FMS_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(dir) = std::env::var("FMS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(source) = std::env::var("FMS_ADMIN_SOURCE") {
            self.admin.source = source.parse().map_err(|e: String| FmsError::Config {
                message: e,
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("env_override")
                    .with_suggestion("FMS_ADMIN_SOURCE must be 'api' or 'local_cache'"),
            })?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> FmsResult<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| FmsError::Config {
            message: format!("Invalid api.base_url '{}': {}", self.api.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion("Use an absolute URL such as http://localhost:8090/feedback_management"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(crate::config_error!(
                format!("api.base_url must use http or https, got '{}'", url.scheme()),
                "config"
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(FmsError::Config {
                message: "api.timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.timeout_seconds to a positive value"),
            });
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(crate::config_error!(
                "storage.data_dir must not be empty",
                "config"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FmsConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.admin.source, FeedbackSourceKind::Api);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://feedback.example.com/api\"\n\n[admin]\nsource = \"local_cache\"\n",
        )
        .unwrap();

        let config = FmsConfig::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "https://feedback.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.admin.source, FeedbackSourceKind::LocalCache);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FmsConfig::default();
        config.api.timeout_seconds = 5;
        config.storage.data_dir = dir.path().join("data");
        config.save_to_file(&path).unwrap();

        let loaded = FmsConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.timeout_seconds, 5);
        assert_eq!(loaded.storage.data_dir, dir.path().join("data"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = FmsConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(FmsError::Config { .. })));

        let mut config = FmsConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = FmsConfig::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn source_kind_parses_aliases() {
        assert_eq!("local-cache".parse::<FeedbackSourceKind>().unwrap(), FeedbackSourceKind::LocalCache);
        assert_eq!("API".parse::<FeedbackSourceKind>().unwrap(), FeedbackSourceKind::Api);
        assert!("db".parse::<FeedbackSourceKind>().is_err());
    }
}
