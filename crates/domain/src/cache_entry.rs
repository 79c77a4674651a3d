use crate::{DomainError, RecordType};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;

pub const FIELD_RECORDS: &str = "records";
pub const FIELD_FETCHED_AT: &str = "fetched_at";
pub const FIELD_RECORD_TYPE: &str = "record_type";

const FETCHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Positive cache entry, stored as a structured (hash-like) value.
///
/// The remaining lifetime is not a field: it is whatever the store's
/// expiry clock says for the entry's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub records: Vec<String>,
    pub fetched_at: DateTime<Utc>,
    pub record_type: RecordType,
}

impl CachedEntry {
    pub fn new(records: Vec<String>, fetched_at: DateTime<Utc>, record_type: RecordType) -> Self {
        Self {
            records,
            fetched_at,
            record_type,
        }
    }

    pub fn fetched_at_display(&self) -> String {
        self.fetched_at.format(FETCHED_AT_FORMAT).to_string()
    }

    /// Field list written to the store. `records` is a JSON array.
    pub fn to_fields(&self) -> Result<Vec<(String, String)>, DomainError> {
        Ok(vec![
            (
                FIELD_RECORDS.to_string(),
                serde_json::to_string(&self.records)?,
            ),
            (FIELD_FETCHED_AT.to_string(), self.fetched_at_display()),
            (
                FIELD_RECORD_TYPE.to_string(),
                self.record_type.as_str().to_string(),
            ),
        ])
    }

    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, DomainError> {
        let raw_records = fields.get(FIELD_RECORDS).ok_or_else(|| {
            DomainError::Serialization("cached entry has no records field".to_string())
        })?;
        let records: Vec<String> = serde_json::from_str(raw_records)?;

        let fetched_at = match fields.get(FIELD_FETCHED_AT) {
            Some(raw) => NaiveDateTime::parse_from_str(raw, FETCHED_AT_FORMAT)
                .map_err(|e| {
                    DomainError::Serialization(format!("invalid fetched_at '{}': {}", raw, e))
                })?
                .and_utc(),
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        let record_type = match fields.get(FIELD_RECORD_TYPE) {
            Some(raw) => raw.parse().map_err(DomainError::InvalidRecordType)?,
            None => RecordType::default(),
        };

        Ok(Self {
            records,
            fetched_at,
            record_type,
        })
    }
}
