pub mod cache;

// Re-export use cases
pub use cache::{CacheInspection, InspectCacheUseCase, InspectedEntry, LookupRecordsUseCase};
