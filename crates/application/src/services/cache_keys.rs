use ferrous_lookup_domain::{DnsQuery, RecordType};

/// Positive and negative store keys for one (domain, record type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKeys {
    pub positive: String,
    pub negative: String,
}

/// Derives store keys. Both keys are scoped by domain *and* type, so an
/// A-record failure never shadows the MX entry of the same domain.
///
/// Layout: `{prefix}:cache:{domain}:{TYPE}` and `{prefix}:nx:{domain}:{TYPE}`.
/// The type mnemonic never contains `:`, so reading a key from the right
/// recovers the pair unambiguously.
#[derive(Debug, Clone)]
pub struct CacheKeyScheme {
    prefix: String,
}

impl CacheKeyScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn keys_for(&self, query: &DnsQuery) -> CacheKeys {
        self.keys(&query.normalized_domain(), query.record_type)
    }

    /// `domain` must already be normalized (lowercase, no trailing dot).
    pub fn keys(&self, domain: &str, record_type: RecordType) -> CacheKeys {
        CacheKeys {
            positive: format!("{}:cache:{}:{}", self.prefix, domain, record_type.as_str()),
            negative: format!("{}:nx:{}:{}", self.prefix, domain, record_type.as_str()),
        }
    }
}

impl Default for CacheKeyScheme {
    fn default() -> Self {
        Self::new("dns")
    }
}
