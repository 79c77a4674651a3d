use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record types the lookup cache accepts.
///
/// `A` is the default for requests that do not name a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    #[default]
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,
    NS,
    SOA,
    SRV,
    CAA,
    NAPTR,
    DNAME,
    DS,
    DNSKEY,
    TLSA,
    SSHFP,
    SVCB,
    HTTPS,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::PTR => "PTR",
            RecordType::NS => "NS",
            RecordType::SOA => "SOA",
            RecordType::SRV => "SRV",
            RecordType::CAA => "CAA",
            RecordType::NAPTR => "NAPTR",
            RecordType::DNAME => "DNAME",
            RecordType::DS => "DS",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::TLSA => "TLSA",
            RecordType::SSHFP => "SSHFP",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
        }
    }

    /// Wire format number (RFC 1035 and successors)
    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::DNSKEY => 48,
            RecordType::TLSA => 52,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::CAA => 257,
        }
    }

    /// Returns `None` for types this cache does not serve.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::all().into_iter().find(|rt| rt.to_u16() == value)
    }

    /// Types whose answers carry host names rather than addresses or blobs.
    pub fn is_name_target(&self) -> bool {
        matches!(
            self,
            RecordType::CNAME | RecordType::NS | RecordType::PTR | RecordType::DNAME
        )
    }

    /// Returns all supported record types
    pub fn all() -> Vec<RecordType> {
        vec![
            RecordType::A,
            RecordType::AAAA,
            RecordType::CNAME,
            RecordType::MX,
            RecordType::TXT,
            RecordType::PTR,
            RecordType::NS,
            RecordType::SOA,
            RecordType::SRV,
            RecordType::CAA,
            RecordType::NAPTR,
            RecordType::DNAME,
            RecordType::DS,
            RecordType::DNSKEY,
            RecordType::TLSA,
            RecordType::SSHFP,
            RecordType::SVCB,
            RecordType::HTTPS,
        ]
    }

    pub fn is_supported(name: &str) -> bool {
        Self::from_str(name).is_ok()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::all()
            .into_iter()
            .find(|rt| rt.as_str() == upper)
            .ok_or_else(|| format!("Invalid record type: {}", s))
    }
}

impl TryFrom<String> for RecordType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}
