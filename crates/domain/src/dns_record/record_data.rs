use std::net::{Ipv4Addr, Ipv6Addr};

/// Payload of one answer record, as handed over by a resolver.
///
/// Host names are stored without the trailing root dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    /// Target of NS, CNAME, PTR and DNAME records
    Name(String),
    Mx {
        preference: u16,
        exchange: String,
    },
    /// Raw character-strings of a TXT record, in wire order.
    /// A single TXT record may be split over several fragments.
    Txt(Vec<Vec<u8>>),
    /// Presentation form of any other supported type (SOA, SRV, CAA, ...)
    Other(String),
}

impl RecordData {
    pub fn mx(preference: u16, exchange: impl Into<String>) -> Self {
        RecordData::Mx {
            preference,
            exchange: exchange.into(),
        }
    }

    pub fn txt<I, B>(fragments: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        RecordData::Txt(fragments.into_iter().map(Into::into).collect())
    }

    pub fn name(target: impl Into<String>) -> Self {
        RecordData::Name(target.into())
    }
}
