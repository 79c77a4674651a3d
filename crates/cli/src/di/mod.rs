use ferrous_lookup_application::ports::{DnsResolver, StoreHandle};
use ferrous_lookup_application::services::CacheKeyScheme;
use ferrous_lookup_application::use_cases::{InspectCacheUseCase, LookupRecordsUseCase};
use ferrous_lookup_domain::Config;
use ferrous_lookup_infrastructure::dns::UpstreamResolver;
use std::sync::Arc;
use tracing::info;

/// Wired use cases, built once at startup.
pub struct UseCases {
    pub lookup: Arc<LookupRecordsUseCase>,
    pub inspect: Arc<InspectCacheUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, store: StoreHandle) -> anyhow::Result<Self> {
        let resolver = UpstreamResolver::from_config(&config.resolver)?;
        info!(
            servers = resolver.servers().len(),
            tcp_fallback = config.resolver.tcp_fallback,
            "Upstream resolver ready"
        );

        Ok(Self::with_resolver(config, store, Arc::new(resolver)))
    }

    pub fn with_resolver(
        config: &Config,
        store: StoreHandle,
        resolver: Arc<dyn DnsResolver>,
    ) -> Self {
        Self {
            lookup: Arc::new(LookupRecordsUseCase::new(
                store.clone(),
                resolver,
                &config.cache,
            )),
            inspect: Arc::new(InspectCacheUseCase::new(
                store,
                CacheKeyScheme::new(config.cache.key_prefix.clone()),
            )),
        }
    }
}
