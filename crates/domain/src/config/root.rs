use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::store::{StoreBackend, StoreConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub store_backend: Option<StoreBackend>,
    pub store_url: Option<String>,
    pub upstream_servers: Vec<String>,
    pub negative_ttl_secs: Option<u32>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the TOML file at `config_path` (defaults when `None`), then
    /// applies the CLI overrides.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_string(),
                    source,
                })?;
                Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_string(),
                    source,
                })?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(backend) = overrides.store_backend {
            self.store.backend = backend;
        }
        if let Some(url) = overrides.store_url {
            self.store.url = url;
        }
        if !overrides.upstream_servers.is_empty() {
            self.resolver.upstream_servers = overrides.upstream_servers;
        }
        if let Some(ttl) = overrides.negative_ttl_secs {
            self.cache.negative_ttl_secs = ttl;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.upstream_servers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one upstream server is required".to_string(),
            ));
        }
        for server in &self.resolver.upstream_servers {
            let server = server.trim();
            if server.parse::<SocketAddr>().is_err() && server.parse::<IpAddr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "upstream server '{}' is not an ip or ip:port address",
                    server
                )));
            }
        }
        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.query_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.cache.negative_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.negative_ttl_secs must be at least 1".to_string(),
            ));
        }
        if self.cache.min_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.min_ttl_secs must be at least 1".to_string(),
            ));
        }
        if self.cache.key_prefix.is_empty() || self.cache.key_prefix.contains(':') {
            return Err(ConfigError::Validation(format!(
                "cache.key_prefix '{}' must be non-empty and must not contain ':'",
                self.cache.key_prefix
            )));
        }

        if self.store.max_connections == 0 {
            return Err(ConfigError::Validation(
                "store.max_connections must be at least 1".to_string(),
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LoggingConfig::LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log format '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }
}
