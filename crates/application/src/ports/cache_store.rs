use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;
use std::collections::HashMap;
use std::sync::Arc;

/// Write operation that can be batched into [`CacheStore::apply_atomic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Replace `key` with a string value that expires after `ttl_secs`
    SetWithExpiry {
        key: String,
        value: String,
        ttl_secs: u32,
    },
    /// Merge fields into the structured entry at `key`.
    /// A fresh entry has no expiry until an `Expire` follows.
    SetFields {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// Set the expiry of an existing key; no-op for a missing key
    Expire { key: String, ttl_secs: u32 },
    Delete { key: String },
}

impl StoreOp {
    pub fn key(&self) -> &str {
        match self {
            StoreOp::SetWithExpiry { key, .. }
            | StoreOp::SetFields { key, .. }
            | StoreOp::Expire { key, .. }
            | StoreOp::Delete { key } => key,
        }
    }
}

/// Remaining lifetime of a key, as read from the store's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExpiry {
    Missing,
    NoExpiry,
    /// Whole seconds left, rounded up: a live key never reports 0
    Remaining(u32),
}

impl KeyExpiry {
    pub fn remaining(&self) -> Option<u32> {
        match self {
            KeyExpiry::Remaining(secs) => Some(*secs),
            _ => None,
        }
    }
}

/// Key-value store with per-key expiry.
///
/// Expired keys must be invisible to every read.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u32)
        -> Result<(), DomainError>;

    /// Returns `true` when a live key was removed.
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Fields of a structured entry; empty when the key is missing.
    async fn get_fields(&self, key: &str) -> Result<HashMap<String, String>, DomainError>;

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), DomainError>;

    /// Returns `true` when the key existed.
    async fn expire(&self, key: &str, ttl_secs: u32) -> Result<bool, DomainError>;

    async fn ttl(&self, key: &str) -> Result<KeyExpiry, DomainError>;

    /// Applies every op or none of them. Concurrent readers see either the
    /// state before the batch or the state after it.
    async fn apply_atomic(&self, ops: Vec<StoreOp>) -> Result<(), DomainError>;
}

/// Store reference handed to the engine at construction time.
#[derive(Clone)]
pub enum StoreHandle {
    Available(Arc<dyn CacheStore>),
    /// The connection failed (or was disabled) at startup
    Unavailable { reason: Arc<str> },
}

impl StoreHandle {
    pub fn available(store: Arc<dyn CacheStore>) -> Self {
        StoreHandle::Available(store)
    }

    pub fn unavailable(reason: impl Into<Arc<str>>) -> Self {
        StoreHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        match self {
            StoreHandle::Available(store) => Some(store),
            StoreHandle::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreHandle::Available(_) => f.write_str("StoreHandle::Available"),
            StoreHandle::Unavailable { reason } => {
                write!(f, "StoreHandle::Unavailable({})", reason)
            }
        }
    }
}
