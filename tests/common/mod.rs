#![allow(dead_code)]

pub mod upstream;

pub use upstream::{MockUpstream, Mode, Zone};

use ferrous_lookup_application::ports::{CacheStore, StoreHandle};
use ferrous_lookup_application::services::CacheKeyScheme;
use ferrous_lookup_application::use_cases::{InspectCacheUseCase, LookupRecordsUseCase};
use ferrous_lookup_domain::config::{CacheConfig, StoreBackend, StoreConfig};
use ferrous_lookup_domain::{DnsQuery, LookupResult, RecordType};
use ferrous_lookup_infrastructure::dns::UpstreamResolver;
use ferrous_lookup_infrastructure::store::{MemoryKvStore, SqliteKvStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Engine wired the way the binary wires it, against mock upstreams.
pub struct Engine {
    pub lookup: Arc<LookupRecordsUseCase>,
    pub inspect: InspectCacheUseCase,
}

impl Engine {
    pub fn new(store: StoreHandle, upstreams: &[SocketAddr]) -> Self {
        Self::with_timeout(store, upstreams, Duration::from_millis(500))
    }

    pub fn with_timeout(store: StoreHandle, upstreams: &[SocketAddr], timeout: Duration) -> Self {
        let cache = CacheConfig::default();
        let resolver = Arc::new(UpstreamResolver::new(upstreams.to_vec(), timeout, true));

        Self {
            lookup: Arc::new(LookupRecordsUseCase::new(store.clone(), resolver, &cache)),
            inspect: InspectCacheUseCase::new(store, CacheKeyScheme::new(cache.key_prefix)),
        }
    }

    pub async fn lookup(&self, domain: &str, record_type: RecordType) -> LookupResult {
        self.lookup
            .execute(&DnsQuery::new(domain, record_type))
            .await
    }
}

pub fn memory_store() -> StoreHandle {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryKvStore::new());
    StoreHandle::available(store)
}

pub async fn sqlite_store(path: &Path) -> StoreHandle {
    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        url: format!("sqlite://{}", path.display()),
        ..StoreConfig::default()
    };
    let store = SqliteKvStore::connect(&config)
        .await
        .expect("open sqlite store");
    StoreHandle::available(Arc::new(store))
}
