use ferrous_lookup_domain::{CachedEntry, DnsQuery, DomainError, RecordType};
use serde::Serialize;
use tracing::instrument;

use crate::ports::StoreHandle;
use crate::services::CacheKeyScheme;

/// What the store currently holds for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InspectedEntry {
    Positive {
        records: Vec<String>,
        fetched_at: String,
    },
    Negative {
        marker: String,
    },
    /// Positive entry whose payload could not be decoded
    Corrupt {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInspection {
    pub key: String,
    pub record_type: RecordType,
    /// `None` when the key has no expiry
    pub ttl_seconds: Option<u32>,
    #[serde(flatten)]
    pub entry: InspectedEntry,
}

/// Read-only view of every cached entry of a domain, across all
/// supported record types.
pub struct InspectCacheUseCase {
    store: StoreHandle,
    keys: CacheKeyScheme,
}

impl InspectCacheUseCase {
    pub fn new(store: StoreHandle, keys: CacheKeyScheme) -> Self {
        Self { store, keys }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str) -> Result<Vec<CacheInspection>, DomainError> {
        let store = match &self.store {
            StoreHandle::Available(store) => store,
            StoreHandle::Unavailable { reason } => {
                return Err(DomainError::StoreUnavailable(reason.to_string()))
            }
        };

        let domain = DnsQuery::for_domain(domain).normalized_domain();
        let mut found = Vec::new();

        for record_type in RecordType::all() {
            let keys = self.keys.keys(&domain, record_type);

            let fields = store.get_fields(&keys.positive).await?;
            if !fields.is_empty() {
                let ttl_seconds = store.ttl(&keys.positive).await?.remaining();
                let entry = match CachedEntry::from_fields(&fields) {
                    Ok(cached) => InspectedEntry::Positive {
                        fetched_at: cached.fetched_at_display(),
                        records: cached.records,
                    },
                    Err(e) => InspectedEntry::Corrupt {
                        reason: e.to_string(),
                    },
                };
                found.push(CacheInspection {
                    key: keys.positive,
                    record_type,
                    ttl_seconds,
                    entry,
                });
            }

            if let Some(marker) = store.get(&keys.negative).await? {
                let ttl_seconds = store.ttl(&keys.negative).await?.remaining();
                found.push(CacheInspection {
                    key: keys.negative,
                    record_type,
                    ttl_seconds,
                    entry: InspectedEntry::Negative { marker },
                });
            }
        }

        Ok(found)
    }
}
