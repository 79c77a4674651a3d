use serde::{Serialize, Serializer};
use std::fmt;

/// Where a lookup answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LookupStatus {
    #[serde(rename = "hit")]
    Hit,
    #[serde(rename = "hit (negative)")]
    HitNegative,
    #[serde(rename = "miss")]
    Miss,
    #[serde(rename = "miss (negative)")]
    MissNegative,
    #[serde(rename = "error")]
    Error,
}

impl LookupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStatus::Hit => "hit",
            LookupStatus::HitNegative => "hit (negative)",
            LookupStatus::Miss => "miss",
            LookupStatus::MissNegative => "miss (negative)",
            LookupStatus::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, LookupStatus::Error)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, LookupStatus::HitNegative | LookupStatus::MissNegative)
    }

    pub fn from_cache(&self) -> bool {
        matches!(self, LookupStatus::Hit | LookupStatus::HitNegative)
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload returned in place of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    pub error: String,
}

impl LookupFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Outcome of one cached lookup. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    #[serde(serialize_with = "serialize_payload")]
    pub records: Result<Vec<String>, LookupFailure>,
    pub ttl_seconds: u32,
    pub status: LookupStatus,
    pub duration_ms: f64,
}

impl LookupResult {
    pub fn hit(records: Vec<String>, ttl_seconds: u32, duration_ms: f64) -> Self {
        Self {
            records: Ok(records),
            ttl_seconds,
            status: LookupStatus::Hit,
            duration_ms,
        }
    }

    pub fn miss(records: Vec<String>, ttl_seconds: u32, duration_ms: f64) -> Self {
        Self {
            records: Ok(records),
            ttl_seconds,
            status: LookupStatus::Miss,
            duration_ms,
        }
    }

    pub fn hit_negative(failure: LookupFailure, ttl_seconds: u32, duration_ms: f64) -> Self {
        Self {
            records: Err(failure),
            ttl_seconds,
            status: LookupStatus::HitNegative,
            duration_ms,
        }
    }

    pub fn miss_negative(failure: LookupFailure, ttl_seconds: u32, duration_ms: f64) -> Self {
        Self {
            records: Err(failure),
            ttl_seconds,
            status: LookupStatus::MissNegative,
            duration_ms,
        }
    }

    pub fn error(failure: LookupFailure, duration_ms: f64) -> Self {
        Self {
            records: Err(failure),
            ttl_seconds: 0,
            status: LookupStatus::Error,
            duration_ms,
        }
    }

    /// Returned without touching the store or the resolver.
    pub fn store_unavailable() -> Self {
        Self::error(LookupFailure::new("cache store connection failed"), 0.0)
    }

    pub fn records(&self) -> Option<&[String]> {
        self.records.as_deref().ok()
    }

    pub fn failure(&self) -> Option<&LookupFailure> {
        self.records.as_ref().err()
    }
}

fn serialize_payload<S>(
    payload: &Result<Vec<String>, LookupFailure>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match payload {
        Ok(records) => records.serialize(serializer),
        Err(failure) => failure.serialize(serializer),
    }
}
