pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

/// Whole seconds left for a key expiring `remaining_ms` from now.
///
/// Rounded up so a key that is still live never reports 0.
pub(crate) fn remaining_secs(remaining_ms: i64) -> u32 {
    if remaining_ms <= 0 {
        return 0;
    }
    let secs = (remaining_ms + 999) / 1000;
    u32::try_from(secs).unwrap_or(u32::MAX)
}
