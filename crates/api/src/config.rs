//! Service Configuration
//!
//! Layered from built-in defaults, an optional TOML/YAML/JSON file, and
//! `DIAG_`-prefixed environment variables (`DIAG_SERVER__PORT=9000`).

use config::{Config, ConfigError, Environment, File};
use fact_collector::CollectorConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::rate_limit::RateLimitConfig;

/// Config file consulted when `DIAG_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "diagnostics.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "DIAG_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "DIAG";

/// Top-level service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub collector: CollectorConfig,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ServiceConfig {
    /// Load from `DIAG_CONFIG` (or `diagnostics.toml`) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file path; a missing file is not an error
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&ServiceConfig::default())?)
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {}", e))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Port cannot be zero".to_string());
        }

        if self.server.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        if self.rate_limit.enabled
            && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0)
        {
            return Err("Rate limit period and burst size must be greater than zero".to_string());
        }

        self.collector.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.collector.high_ram_threshold, 70.0);
        assert_eq!(config.collector.validation.temp_range, (0.0, 120.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("diag-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[collector]
high_temp_threshold = 80.0
"#,
        )
        .unwrap();

        let config = ServiceConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.collector.high_temp_threshold, 80.0);
        assert_eq!(config.collector.high_ram_threshold, 70.0);
        assert_eq!(config.socket_addr().unwrap().port(), 9090);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServiceConfig::load_from("/nonexistent/diagnostics").unwrap();
        assert_eq!(config.collector, CollectorConfig::default());
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("DIAG_LOGGING__FORMAT", "json");
        let config = ServiceConfig::load_from("/nonexistent/diagnostics");
        std::env::remove_var("DIAG_LOGGING__FORMAT");

        assert_eq!(config.unwrap().logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServiceConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.rate_limit.enabled = true;
        config.rate_limit.burst_size = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.collector.validation.ram_range = (100.0, 0.0);
        assert!(config.validate().is_err());
    }
}
