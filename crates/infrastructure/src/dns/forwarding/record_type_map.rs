use ferrous_lookup_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        match record_type {
            // Basic records
            RecordType::A => HickoryRecordType::A,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::SOA => HickoryRecordType::SOA,

            // Advanced records
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::CAA => HickoryRecordType::CAA,
            RecordType::NAPTR => HickoryRecordType::NAPTR,
            RecordType::DS => HickoryRecordType::DS,
            RecordType::DNSKEY => HickoryRecordType::DNSKEY,
            RecordType::TLSA => HickoryRecordType::TLSA,
            RecordType::SSHFP => HickoryRecordType::SSHFP,
            RecordType::SVCB => HickoryRecordType::SVCB,
            RecordType::HTTPS => HickoryRecordType::HTTPS,

            // No dedicated hickory variant
            RecordType::DNAME => HickoryRecordType::Unknown(RecordType::DNAME.to_u16()),
        }
    }

    /// Convert hickory RecordType → domain RecordType.
    ///
    /// Returns `None` for unsupported record types.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        RecordType::from_u16(u16::from(hickory_type))
    }

    /// Whether an answer record of `hickory_type` belongs to a question
    /// for `requested`.
    pub fn matches(requested: RecordType, hickory_type: HickoryRecordType) -> bool {
        Self::from_hickory(hickory_type) == Some(requested)
    }
}
