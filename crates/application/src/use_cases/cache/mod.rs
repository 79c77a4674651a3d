pub mod inspect;
pub mod lookup;

pub use inspect::{CacheInspection, InspectCacheUseCase, InspectedEntry};
pub use lookup::LookupRecordsUseCase;
