use async_trait::async_trait;
use ferrous_lookup_domain::{DnsQuery, DomainError, RecordData};

/// Answer set for one (domain, record type) question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    /// Records of the requested type, in the order the resolver returned them
    pub records: Vec<RecordData>,
    /// TTL advertised upstream for the answer set, in seconds
    pub ttl: u32,
}

impl DnsAnswer {
    pub fn new(records: Vec<RecordData>, ttl: u32) -> Self {
        Self { records, ttl }
    }
}

/// Live resolution capability.
///
/// Failures must use `DomainError::NxDomain`, `NoAnswer` or `NoNameservers`
/// for the "not found" class; any other variant is treated as a plain
/// failure. Implementations own their timeout policy.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError>;
}
