pub mod cache_store;
pub mod dns_resolver;

pub use cache_store::{CacheStore, KeyExpiry, StoreHandle, StoreOp};
pub use dns_resolver::{DnsAnswer, DnsResolver};
