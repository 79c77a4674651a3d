use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// DNS lookup request (domain + record type).
/// Uses `Arc<str>` so the query can be cloned cheaply across the
/// orchestrator, resolver and writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// Query for the default record type (A).
    pub fn for_domain(domain: impl Into<Arc<str>>) -> Self {
        Self::new(domain, RecordType::default())
    }

    /// Lowercased domain without the trailing root dot.
    pub fn normalized_domain(&self) -> String {
        self.domain.trim_end_matches('.').to_ascii_lowercase()
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.domain, self.record_type)
    }
}
