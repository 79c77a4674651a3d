use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("The DNS query name does not exist: {0}")]
    NxDomain(String),

    #[error("The DNS response does not contain an answer to the question: {0}")]
    NoAnswer(String),

    #[error("All nameservers failed to answer the query: {0}")]
    NoNameservers(String),

    #[error("Query timeout: {0}")]
    QueryTimeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Record decode error: {0}")]
    RecordDecode(String),

    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Cache store error: {0}")]
    StoreError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Resolver failures that mean "nothing to find here" and are worth
    /// remembering for a short while.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            DomainError::NxDomain(_) | DomainError::NoAnswer(_) | DomainError::NoNameservers(_)
        )
    }

    /// Short class name used in negative lookup messages.
    pub fn negative_class(&self) -> Option<&'static str> {
        match self {
            DomainError::NxDomain(_) => Some("NXDOMAIN"),
            DomainError::NoAnswer(_) => Some("NoAnswer"),
            DomainError::NoNameservers(_) => Some("NoNameservers"),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
