use chrono::Utc;
use ferrous_lookup_domain::config::CacheConfig;
use ferrous_lookup_domain::{CachedEntry, DnsQuery, DomainError, LookupFailure, LookupResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::ports::{CacheStore, DnsResolver, StoreHandle};
use crate::services::{CacheKeyScheme, CacheKeys, CacheWriter, RecordNormalizer, NEGATIVE_MARKER};

/// Cached DNS lookup.
///
/// Order of checks: positive entry, then negative marker, then a live
/// resolution whose outcome is written back. A positive entry can only
/// exist if it was written after any negative marker for the same pair
/// (the writer deletes the marker in the same batch), so it always wins.
pub struct LookupRecordsUseCase {
    store: StoreHandle,
    resolver: Arc<dyn DnsResolver>,
    keys: CacheKeyScheme,
    writer: Option<CacheWriter>,
}

impl LookupRecordsUseCase {
    pub fn new(store: StoreHandle, resolver: Arc<dyn DnsResolver>, config: &CacheConfig) -> Self {
        let writer = store.store().map(|store| {
            CacheWriter::new(
                Arc::clone(store),
                config.negative_ttl_secs,
                config.min_ttl_secs,
            )
        });

        Self {
            store,
            resolver,
            keys: CacheKeyScheme::new(config.key_prefix.clone()),
            writer,
        }
    }

    /// Never fails: every error is folded into a `LookupResult` with
    /// status `error`.
    #[instrument(skip(self), fields(domain = %query.domain, record_type = %query.record_type))]
    pub async fn execute(&self, query: &DnsQuery) -> LookupResult {
        let (store, writer) = match (self.store.store(), self.writer.as_ref()) {
            (Some(store), Some(writer)) => (store, writer),
            _ => {
                warn!("Cache store unavailable, lookup not attempted");
                return LookupResult::store_unavailable();
            }
        };

        let started = Instant::now();
        let keys = self.keys.keys_for(query);

        match self.run(store.as_ref(), writer, query, &keys, started).await {
            Ok(result) => {
                info!(
                    status = %result.status,
                    ttl = result.ttl_seconds,
                    duration_ms = result.duration_ms,
                    "Lookup completed"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, "Lookup failed");
                LookupResult::error(LookupFailure::new(e.to_string()), elapsed_ms(started))
            }
        }
    }

    async fn run(
        &self,
        store: &dyn CacheStore,
        writer: &CacheWriter,
        query: &DnsQuery,
        keys: &CacheKeys,
        started: Instant,
    ) -> Result<LookupResult, DomainError> {
        if let Some(hit) = Self::check_positive(store, keys, started).await? {
            return Ok(hit);
        }

        if let Some(hit) = Self::check_negative(store, query, keys, started).await? {
            return Ok(hit);
        }

        debug!(key = %keys.positive, "Cache MISS, resolving upstream");

        match self.resolver.resolve(query).await {
            Ok(answer) => {
                let records = RecordNormalizer::normalize(&answer, query.record_type)?;
                let entry = CachedEntry::new(records, Utc::now(), query.record_type);
                let ttl = writer.write_positive(keys, &entry, answer.ttl).await?;

                Ok(LookupResult::miss(entry.records, ttl, elapsed_ms(started)))
            }
            Err(e) if e.is_negative() => {
                let class = e.negative_class().unwrap_or(NEGATIVE_MARKER);
                let ttl = writer.write_negative(keys, class).await?;

                debug!(error = %e, "Upstream reported no data, negative marker stored");

                Ok(LookupResult::miss_negative(
                    LookupFailure::new(format!(
                        "{} record not found for {} (Error: {})",
                        query.record_type, query.domain, class
                    )),
                    ttl,
                    elapsed_ms(started),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn check_positive(
        store: &dyn CacheStore,
        keys: &CacheKeys,
        started: Instant,
    ) -> Result<Option<LookupResult>, DomainError> {
        let fields = store.get_fields(&keys.positive).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        // Gone between the two reads: treat as absent
        let Some(ttl) = store.ttl(&keys.positive).await?.remaining() else {
            return Ok(None);
        };

        let entry = CachedEntry::from_fields(&fields)?;
        debug!(key = %keys.positive, ttl = ttl, "Cache HIT");

        Ok(Some(LookupResult::hit(entry.records, ttl, elapsed_ms(started))))
    }

    async fn check_negative(
        store: &dyn CacheStore,
        query: &DnsQuery,
        keys: &CacheKeys,
        started: Instant,
    ) -> Result<Option<LookupResult>, DomainError> {
        if store.get(&keys.negative).await?.is_none() {
            return Ok(None);
        }

        let Some(ttl) = store.ttl(&keys.negative).await?.remaining() else {
            return Ok(None);
        };

        debug!(key = %keys.negative, ttl = ttl, "Negative cache HIT");

        Ok(Some(LookupResult::hit_negative(
            LookupFailure::new(format!(
                "{} record not found (Cached)",
                query.record_type
            )),
            ttl,
            elapsed_ms(started),
        )))
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
