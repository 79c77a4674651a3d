use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend holding the cache entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite file (or `sqlite::memory:`) through sqlx
    #[default]
    Sqlite,
    /// Process-local map, gone when the process exits
    Memory,
    /// No store: every lookup fails fast
    Disabled,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
            StoreBackend::Disabled => "disabled",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            "disabled" => Ok(StoreBackend::Disabled),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// Key-value store configuration.
/// The connection is made once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection URL (default: "sqlite://./ferrous-lookup.db")
    #[serde(default = "default_store_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_store_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_store_url() -> String {
    "sqlite://./ferrous-lookup.db".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_connect_timeout_secs() -> u64 {
    5
}
