//! Configuration module for Ferrous Lookup
//!
//! - `root`: Main configuration and CLI overrides
//! - `store`: Key-value store backend and connection
//! - `resolver`: Upstream DNS servers
//! - `cache`: Key namespace and TTL policy
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod store;

pub use cache::{CacheConfig, NEGATIVE_CACHE_TTL_SECONDS};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use store::{StoreBackend, StoreConfig};
