pub mod cache_keys;
pub mod cache_writer;
pub mod record_normalizer;

pub use cache_keys::{CacheKeyScheme, CacheKeys};
pub use cache_writer::{CacheWriter, NEGATIVE_MARKER};
pub use record_normalizer::RecordNormalizer;
