use crate::ports::DnsAnswer;
use ferrous_lookup_domain::{DomainError, RecordData, RecordType};

/// Turns resolver answers into the strings stored in the cache.
///
/// Output order is the resolver's order; nothing is sorted.
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn normalize(
        answer: &DnsAnswer,
        record_type: RecordType,
    ) -> Result<Vec<String>, DomainError> {
        answer
            .records
            .iter()
            .map(|record| Self::render(record, record_type))
            .collect()
    }

    /// Renders a single record.
    ///
    /// - MX: `"<preference> <exchange>"`
    /// - TXT: all fragments joined, then decoded as UTF-8 (strict)
    /// - everything else: canonical text form
    pub fn render(record: &RecordData, record_type: RecordType) -> Result<String, DomainError> {
        match record {
            RecordData::A(addr) => Ok(addr.to_string()),
            RecordData::AAAA(addr) => Ok(addr.to_string()),
            RecordData::Name(target) => Ok(target.trim_end_matches('.').to_string()),
            RecordData::Mx {
                preference,
                exchange,
            } => Ok(format!(
                "{} {}",
                preference,
                exchange.trim_end_matches('.')
            )),
            RecordData::Txt(fragments) => {
                // Decode after joining: a multi-byte character may straddle
                // two fragments.
                let joined = fragments.concat();
                String::from_utf8(joined).map_err(|e| {
                    DomainError::RecordDecode(format!(
                        "{} record is not valid UTF-8: {}",
                        record_type, e
                    ))
                })
            }
            RecordData::Other(text) => Ok(text.clone()),
        }
    }
}
