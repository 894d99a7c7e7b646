use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::query::QueryConfig;

const LOCAL_CONFIG_PATH: &str = "compactdenial.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/compactdenial/config.toml";

/// Main configuration structure for compactdenial
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolver list and query flags
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. compactdenial.toml in current directory
    /// 3. /etc/compactdenial/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if !overrides.resolvers.is_empty() {
            self.query.resolvers = overrides.resolvers;
        }
        if let Some(payload) = overrides.udp_payload {
            self.query.udp_payload = payload;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.query.timeout_secs = timeout;
        }
        if overrides.compact_ok {
            self.query.compact_ok = true;
        }
        if overrides.allow_unauthenticated {
            self.query.require_authenticated = false;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.query.validate().map_err(ConfigError::Validation)
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub resolvers: Vec<String>,
    pub udp_payload: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub compact_ok: bool,
    pub allow_unauthenticated: bool,
    pub log_level: Option<String>,
}
