use async_trait::async_trait;
use ferrous_lookup_application::ports::{CacheStore, KeyExpiry, StoreOp};
use ferrous_lookup_domain::DomainError;
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::remaining_secs;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Process-local key-value store.
///
/// Uses `tokio::time::Instant`, so expiry follows a paused test clock.
/// Batches hold the write lock from the first staged op to the commit.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<FxHashMap<String, Entry>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|e| e.is_live(now))
            .cloned()
    }
}

/// Changes staged by a batch on top of the committed map.
/// `None` marks a deletion.
struct Overlay<'a> {
    base: &'a FxHashMap<String, Entry>,
    staged: FxHashMap<String, Option<Entry>>,
    now: Instant,
}

impl<'a> Overlay<'a> {
    fn new(base: &'a FxHashMap<String, Entry>, now: Instant) -> Self {
        Self {
            base,
            staged: FxHashMap::default(),
            now,
        }
    }

    fn current(&self, key: &str) -> Option<Entry> {
        match self.staged.get(key) {
            Some(staged) => staged.clone(),
            None => self.base.get(key).cloned(),
        }
        .filter(|e| e.is_live(self.now))
    }

    fn apply(&mut self, op: &StoreOp) -> Result<bool, DomainError> {
        match op {
            StoreOp::SetWithExpiry {
                key,
                value,
                ttl_secs,
            } => {
                let entry = Entry {
                    value: Value::Str(value.clone()),
                    expires_at: Some(self.now + Duration::from_secs(u64::from(*ttl_secs))),
                };
                self.staged.insert(key.clone(), Some(entry));
                Ok(true)
            }
            StoreOp::SetFields { key, fields } => {
                let mut entry = match self.current(key) {
                    Some(Entry {
                        value: Value::Str(_),
                        ..
                    }) => return Err(wrong_type(key)),
                    Some(entry) => entry,
                    None => Entry {
                        value: Value::Hash(HashMap::new()),
                        expires_at: None,
                    },
                };
                if let Value::Hash(map) = &mut entry.value {
                    for (field, value) in fields {
                        map.insert(field.clone(), value.clone());
                    }
                }
                self.staged.insert(key.clone(), Some(entry));
                Ok(true)
            }
            StoreOp::Expire { key, ttl_secs } => match self.current(key) {
                Some(mut entry) => {
                    entry.expires_at = Some(self.now + Duration::from_secs(u64::from(*ttl_secs)));
                    self.staged.insert(key.clone(), Some(entry));
                    Ok(true)
                }
                None => Ok(false),
            },
            StoreOp::Delete { key } => {
                let existed = self.current(key).is_some();
                self.staged.insert(key.clone(), None);
                Ok(existed)
            }
        }
    }

    fn into_staged(self) -> FxHashMap<String, Option<Entry>> {
        self.staged
    }
}

impl MemoryKvStore {
    async fn run_batch(&self, ops: &[StoreOp]) -> Result<Vec<bool>, DomainError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let mut overlay = Overlay::new(&entries, now);
        let touched = ops
            .iter()
            .map(|op| overlay.apply(op))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, staged) in overlay.into_staged() {
            match staged {
                Some(entry) => {
                    entries.insert(key, entry);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        entries.retain(|_, e| e.is_live(now));

        Ok(touched)
    }

    async fn run_one(&self, op: StoreOp) -> Result<bool, DomainError> {
        let touched = self.run_batch(std::slice::from_ref(&op)).await?;
        Ok(touched.first().copied().unwrap_or(false))
    }
}

#[async_trait]
impl CacheStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.live(key).await.map(|e| e.value) {
            Some(Value::Str(value)) => Ok(Some(value)),
            Some(Value::Hash(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u32,
    ) -> Result<(), DomainError> {
        self.run_one(StoreOp::SetWithExpiry {
            key: key.to_string(),
            value: value.to_string(),
            ttl_secs,
        })
        .await
        .map(|_| ())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.run_one(StoreOp::Delete {
            key: key.to_string(),
        })
        .await
    }

    async fn get_fields(&self, key: &str) -> Result<HashMap<String, String>, DomainError> {
        match self.live(key).await.map(|e| e.value) {
            Some(Value::Hash(map)) => Ok(map),
            Some(Value::Str(_)) => Err(wrong_type(key)),
            None => Ok(HashMap::new()),
        }
    }

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), DomainError> {
        self.run_one(StoreOp::SetFields {
            key: key.to_string(),
            fields: fields.to_vec(),
        })
        .await
        .map(|_| ())
    }

    async fn expire(&self, key: &str, ttl_secs: u32) -> Result<bool, DomainError> {
        self.run_one(StoreOp::Expire {
            key: key.to_string(),
            ttl_secs,
        })
        .await
    }

    async fn ttl(&self, key: &str) -> Result<KeyExpiry, DomainError> {
        let now = Instant::now();
        Ok(match self.live(key).await {
            None => KeyExpiry::Missing,
            Some(Entry {
                expires_at: None, ..
            }) => KeyExpiry::NoExpiry,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                let ms = at.saturating_duration_since(now).as_millis();
                KeyExpiry::Remaining(remaining_secs(i64::try_from(ms).unwrap_or(i64::MAX)))
            }
        })
    }

    async fn apply_atomic(&self, ops: Vec<StoreOp>) -> Result<(), DomainError> {
        self.run_batch(&ops).await.map(|_| ())
    }
}

fn wrong_type(key: &str) -> DomainError {
    DomainError::StoreError(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}
