//! Ferrous Lookup Domain Layer
pub mod cache_entry;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod lookup;
pub mod validators;

pub use cache_entry::CachedEntry;
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::{RecordData, RecordType};
pub use errors::DomainError;
pub use lookup::{LookupFailure, LookupResult, LookupStatus};
