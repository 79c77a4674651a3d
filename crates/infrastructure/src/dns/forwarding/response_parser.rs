use ferrous_lookup_application::ports::DnsAnswer;
use ferrous_lookup_domain::{DomainError, RecordData, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData};
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder};
use tracing::debug;

use super::record_type_map::RecordTypeMapper;

/// Hickory has no typed DNAME rdata; it arrives as an unknown record.
const DNAME_CODE: u16 = 39;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    /// Answer records of the requested type, in wire order
    pub records: Vec<RecordData>,

    /// Smallest TTL among `records`
    pub min_ttl: Option<u32>,
}

impl DnsResponse {
    pub fn into_answer(self) -> DnsAnswer {
        DnsAnswer::new(self.records, self.min_ttl.unwrap_or(0))
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parses a wire-format response, keeping only the answers of type
    /// `requested`. Alias records on the way (a CNAME in front of an A
    /// answer) are dropped.
    pub fn parse(response_bytes: &[u8], requested: RecordType) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        let mut records = Vec::with_capacity(message.answers().len().min(8));
        let mut min_ttl: Option<u32> = None;

        for record in message.answers() {
            if !RecordTypeMapper::matches(requested, record.record_type()) {
                continue;
            }

            let record_ttl = record.ttl();
            min_ttl = Some(min_ttl.map_or(record_ttl, |current| current.min(record_ttl)));

            records.push(Self::record_data(record.data())?);
        }

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            matching = records.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id: message.id(),
            rcode,
            truncated,
            records,
            min_ttl,
        })
    }

    fn record_data(rdata: &RData) -> Result<RecordData, DomainError> {
        Ok(match rdata {
            RData::A(a) => RecordData::A(a.0),
            RData::AAAA(aaaa) => RecordData::AAAA(aaaa.0),
            RData::CNAME(canonical) => RecordData::Name(strip_root(canonical.to_utf8())),
            RData::PTR(ptr) => RecordData::Name(strip_root(ptr.to_utf8())),
            RData::NS(ns) => RecordData::Name(strip_root(ns.to_utf8())),
            RData::MX(mx) => {
                RecordData::mx(mx.preference(), strip_root(mx.exchange().to_utf8()))
            }
            RData::TXT(txt) => {
                RecordData::Txt(txt.txt_data().iter().map(|f| f.to_vec()).collect())
            }
            RData::Unknown { code, rdata } if u16::from(*code) == DNAME_CODE => {
                RecordData::Name(strip_root(Self::dname_target(rdata.anything())?))
            }
            other => RecordData::Other(other.to_string()),
        })
    }

    /// DNAME target: a single uncompressed domain name (RFC 6672)
    fn dname_target(data: &[u8]) -> Result<String, DomainError> {
        let mut decoder = BinDecoder::new(data);
        let target = Name::read(&mut decoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Malformed DNAME record: {}", e))
        })?;
        Ok(target.to_utf8())
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

fn strip_root(name: String) -> String {
    match name.strip_suffix('.') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}
