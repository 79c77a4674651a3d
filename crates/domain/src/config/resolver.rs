use serde::{Deserialize, Serialize};

/// Upstream resolution settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Upstream servers as `ip:port`, tried in order
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Per-server timeout in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Retry over TCP when a UDP answer comes back truncated
    #[serde(default = "default_true")]
    pub tcp_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            query_timeout_ms: default_query_timeout_ms(),
            tcp_fallback: true,
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["1.1.1.1:53".to_string(), "8.8.8.8:53".to_string()]
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
