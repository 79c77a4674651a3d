use ferrous_lookup_application::ports::StoreHandle;
use ferrous_lookup_domain::config::{StoreBackend, StoreConfig};
use ferrous_lookup_infrastructure::store::{MemoryKvStore, SqliteKvStore};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Connects to the configured store once. A failed connection does not
/// abort startup: lookups then report the store as unavailable.
pub async fn init_store(cfg: &StoreConfig) -> StoreHandle {
    match cfg.backend {
        StoreBackend::Disabled => {
            warn!("Cache store disabled by configuration");
            StoreHandle::unavailable("cache store disabled by configuration")
        }
        StoreBackend::Memory => {
            info!("Using in-process cache store");
            StoreHandle::available(Arc::new(MemoryKvStore::new()))
        }
        StoreBackend::Sqlite => {
            info!("Initializing cache store: {}", cfg.url);

            match SqliteKvStore::connect(cfg).await {
                Ok(store) => {
                    match store.purge_expired().await {
                        Ok(removed) => info!(removed = removed, "Cache store ready"),
                        Err(e) => warn!(error = %e, "Expired entry purge failed (non-critical)"),
                    }
                    StoreHandle::available(Arc::new(store))
                }
                Err(e) => {
                    error!(error = %e, "Cache store connection failed");
                    StoreHandle::unavailable(e.to_string())
                }
            }
        }
    }
}
