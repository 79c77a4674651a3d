use serde::{Deserialize, Serialize};

/// Default lifetime of a negative cache marker, in seconds
pub const NEGATIVE_CACHE_TTL_SECONDS: u32 = 60;

/// Cache policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Namespace of every key (default: "dns")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Lifetime of "not found" markers
    #[serde(default = "default_negative_ttl_secs")]
    pub negative_ttl_secs: u32,

    /// Floor applied to upstream TTLs; a zero TTL would otherwise
    /// leave nothing (or something immortal) in the store
    #[serde(default = "default_min_ttl_secs")]
    pub min_ttl_secs: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            negative_ttl_secs: default_negative_ttl_secs(),
            min_ttl_secs: default_min_ttl_secs(),
        }
    }
}

fn default_key_prefix() -> String {
    "dns".to_string()
}

fn default_negative_ttl_secs() -> u32 {
    NEGATIVE_CACHE_TTL_SECONDS
}

fn default_min_ttl_secs() -> u32 {
    1
}
