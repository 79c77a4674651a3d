#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_lookup_application::ports::{
    CacheStore, DnsAnswer, DnsResolver, KeyExpiry, StoreOp,
};
use ferrous_lookup_domain::{DnsQuery, DomainError, RecordType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Fake CacheStore
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum FakeValue {
    Str(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct FakeSlot {
    value: FakeValue,
    /// Remaining seconds; `None` = no expiry
    ttl: Option<u32>,
}

/// In-memory store with a manual clock (`advance`) and a log of every
/// atomic batch it received.
#[derive(Default)]
pub struct FakeCacheStore {
    slots: RwLock<HashMap<String, FakeSlot>>,
    batches: RwLock<Vec<Vec<StoreOp>>>,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl FakeCacheStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Moves the clock forward; keys reaching zero disappear.
    pub async fn advance(&self, secs: u32) {
        let mut slots = self.slots.write().await;
        slots.retain(|_, slot| match slot.ttl {
            Some(ttl) if ttl <= secs => false,
            Some(ttl) => {
                slot.ttl = Some(ttl - secs);
                true
            }
            None => true,
        });
    }

    pub async fn seed_string(&self, key: &str, value: &str, ttl: u32) {
        self.slots.write().await.insert(
            key.to_string(),
            FakeSlot {
                value: FakeValue::Str(value.to_string()),
                ttl: Some(ttl),
            },
        );
    }

    pub async fn seed_fields(&self, key: &str, fields: &[(&str, &str)], ttl: Option<u32>) {
        let map = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.slots.write().await.insert(
            key.to_string(),
            FakeSlot {
                value: FakeValue::Hash(map),
                ttl,
            },
        );
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.slots.read().await.contains_key(key)
    }

    pub async fn remaining(&self, key: &str) -> Option<u32> {
        self.slots.read().await.get(key).and_then(|s| s.ttl)
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn batches(&self) -> Vec<Vec<StoreOp>> {
        self.batches.read().await.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::StoreError("fake write failure".to_string()));
        }
        Ok(())
    }

    fn apply(slots: &mut HashMap<String, FakeSlot>, op: &StoreOp) -> Result<(), DomainError> {
        match op {
            StoreOp::SetWithExpiry { key, value, ttl_secs } => {
                slots.insert(
                    key.clone(),
                    FakeSlot {
                        value: FakeValue::Str(value.clone()),
                        ttl: Some(*ttl_secs),
                    },
                );
            }
            StoreOp::SetFields { key, fields } => {
                let slot = slots.entry(key.clone()).or_insert_with(|| FakeSlot {
                    value: FakeValue::Hash(HashMap::new()),
                    ttl: None,
                });
                match &mut slot.value {
                    FakeValue::Hash(map) => {
                        for (k, v) in fields {
                            map.insert(k.clone(), v.clone());
                        }
                    }
                    FakeValue::Str(_) => {
                        return Err(DomainError::StoreError("WRONGTYPE".to_string()))
                    }
                }
            }
            StoreOp::Expire { key, ttl_secs } => {
                if let Some(slot) = slots.get_mut(key) {
                    slot.ttl = Some(*ttl_secs);
                }
            }
            StoreOp::Delete { key } => {
                slots.remove(key);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FakeCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.slots.read().await.get(key) {
            Some(FakeSlot {
                value: FakeValue::Str(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(DomainError::StoreError("WRONGTYPE".to_string())),
            None => Ok(None),
        }
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u32,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let op = StoreOp::SetWithExpiry {
            key: key.to_string(),
            value: value.to_string(),
            ttl_secs,
        };
        Self::apply(&mut *self.slots.write().await, &op)
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.check_writable()?;
        Ok(self.slots.write().await.remove(key).is_some())
    }

    async fn get_fields(&self, key: &str) -> Result<HashMap<String, String>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.slots.read().await.get(key) {
            Some(FakeSlot {
                value: FakeValue::Hash(map),
                ..
            }) => Ok(map.clone()),
            Some(_) => Err(DomainError::StoreError("WRONGTYPE".to_string())),
            None => Ok(HashMap::new()),
        }
    }

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), DomainError> {
        self.check_writable()?;
        let op = StoreOp::SetFields {
            key: key.to_string(),
            fields: fields.to_vec(),
        };
        Self::apply(&mut *self.slots.write().await, &op)
    }

    async fn expire(&self, key: &str, ttl_secs: u32) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut slots = self.slots.write().await;
        match slots.get_mut(key) {
            Some(slot) => {
                slot.ttl = Some(ttl_secs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<KeyExpiry, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(match self.slots.read().await.get(key) {
            None => KeyExpiry::Missing,
            Some(FakeSlot { ttl: None, .. }) => KeyExpiry::NoExpiry,
            Some(FakeSlot { ttl: Some(t), .. }) => KeyExpiry::Remaining(*t),
        })
    }

    async fn apply_atomic(&self, ops: Vec<StoreOp>) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut slots = self.slots.write().await;
        let mut staged = slots.clone();
        for op in &ops {
            Self::apply(&mut staged, op)?;
        }
        *slots = staged;
        self.batches.write().await.push(ops);
        Ok(())
    }
}

// ============================================================================
// Mock DnsResolver
// ============================================================================

/// Resolver with scripted outcomes per (domain, type). Unscripted questions
/// fail with NXDOMAIN.
#[derive(Default)]
pub struct MockDnsResolver {
    responses: RwLock<HashMap<(String, RecordType), Result<DnsAnswer, DomainError>>>,
    calls: AtomicUsize,
}

impl MockDnsResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn set_answer(&self, domain: &str, record_type: RecordType, answer: DnsAnswer) {
        self.responses
            .write()
            .await
            .insert((domain.to_string(), record_type), Ok(answer));
    }

    pub async fn set_error(&self, domain: &str, record_type: RecordType, error: DomainError) {
        self.responses
            .write()
            .await
            .insert((domain.to_string(), record_type), Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .read()
            .await
            .get(&(query.domain.to_string(), query.record_type))
            .cloned()
            .unwrap_or_else(|| Err(DomainError::NxDomain(query.domain.to_string())))
    }
}
