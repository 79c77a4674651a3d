use crate::ports::{CacheStore, StoreOp};
use crate::services::CacheKeys;
use ferrous_lookup_domain::{CachedEntry, DomainError};
use std::sync::Arc;
use tracing::debug;

/// Marker stored under a negative key when no finer class is known
pub const NEGATIVE_MARKER: &str = "NXDOMAIN";

/// Writes lookup outcomes into the store.
pub struct CacheWriter {
    store: Arc<dyn CacheStore>,
    negative_ttl_secs: u32,
    min_ttl_secs: u32,
}

impl CacheWriter {
    pub fn new(store: Arc<dyn CacheStore>, negative_ttl_secs: u32, min_ttl_secs: u32) -> Self {
        Self {
            store,
            negative_ttl_secs,
            min_ttl_secs: min_ttl_secs.max(1),
        }
    }

    /// TTL actually written for an upstream TTL. Zero is raised to the
    /// configured floor so no entry is created without an expiry.
    pub fn effective_ttl(&self, upstream_ttl: u32) -> u32 {
        upstream_ttl.max(self.min_ttl_secs)
    }

    /// Stores a positive entry, sets its expiry and drops the negative
    /// marker for the same pair, as one atomic batch.
    ///
    /// Returns the TTL that was applied.
    pub async fn write_positive(
        &self,
        keys: &CacheKeys,
        entry: &CachedEntry,
        upstream_ttl: u32,
    ) -> Result<u32, DomainError> {
        let ttl_secs = self.effective_ttl(upstream_ttl);

        let ops = vec![
            StoreOp::SetFields {
                key: keys.positive.clone(),
                fields: entry.to_fields()?,
            },
            StoreOp::Expire {
                key: keys.positive.clone(),
                ttl_secs,
            },
            StoreOp::Delete {
                key: keys.negative.clone(),
            },
        ];

        self.store.apply_atomic(ops).await?;

        debug!(
            key = %keys.positive,
            records = entry.records.len(),
            ttl = ttl_secs,
            "Positive entry stored"
        );

        Ok(ttl_secs)
    }

    /// Stores (or re-arms) the negative marker. Leaves the positive key alone.
    pub async fn write_negative(&self, keys: &CacheKeys, marker: &str) -> Result<u32, DomainError> {
        self.store
            .set_with_expiry(&keys.negative, marker, self.negative_ttl_secs)
            .await?;

        debug!(
            key = %keys.negative,
            marker = marker,
            ttl = self.negative_ttl_secs,
            "Negative marker stored"
        );

        Ok(self.negative_ttl_secs)
    }
}
