use async_trait::async_trait;
use ferrous_lookup_application::ports::{CacheStore, KeyExpiry, StoreOp};
use ferrous_lookup_domain::config::StoreConfig;
use ferrous_lookup_domain::DomainError;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use super::remaining_secs;
use crate::database::create_pool;

const KIND_STRING: &str = "string";
const KIND_HASH: &str = "hash";

/// (kind, value, expires_at)
type EntryRow = (String, String, Option<i64>);

/// Key-value store with expiry on top of a single SQLite table.
///
/// Hash entries keep their fields as a JSON object. Expiry is an absolute
/// unix timestamp in milliseconds; expired rows are filtered out of every
/// read and removed by `purge_expired` or by the next write to the key.
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(cfg: &StoreConfig) -> Result<Self, DomainError> {
        let pool = create_pool(cfg).await.map_err(|e| {
            error!(url = %cfg.url, error = %e, "Failed to open SQLite store");
            DomainError::StoreUnavailable(e.to_string())
        })?;
        Ok(Self::new(pool))
    }

    /// Deletes every expired row. Returns how many were removed.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(now_ms())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        debug!(removed = result.rows_affected(), "Expired entries purged");
        Ok(result.rows_affected())
    }

    async fn fetch_live<'e, E>(
        executor: E,
        key: &str,
        now: i64,
    ) -> Result<Option<EntryRow>, DomainError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, EntryRow>(
            "SELECT kind, value, expires_at FROM kv_entries
             WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(now)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
    }

    /// Runs `ops` in one transaction. Returns, per op, whether it touched
    /// a live key.
    async fn run_batch(&self, ops: &[StoreOp]) -> Result<Vec<bool>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let now = now_ms();

        // Clearing expired rows of the touched keys first also takes the
        // write lock before anything is read.
        for op in ops {
            sqlx::query(
                "DELETE FROM kv_entries
                 WHERE key = ? AND expires_at IS NOT NULL AND expires_at <= ?",
            )
            .bind(op.key())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        let mut touched = Vec::with_capacity(ops.len());
        for op in ops {
            touched.push(Self::apply_op(&mut tx, op, now).await?);
        }

        tx.commit().await.map_err(db_error)?;
        Ok(touched)
    }

    async fn apply_op(
        conn: &mut SqliteConnection,
        op: &StoreOp,
        now: i64,
    ) -> Result<bool, DomainError> {
        match op {
            StoreOp::SetWithExpiry {
                key,
                value,
                ttl_secs,
            } => {
                sqlx::query(
                    "INSERT INTO kv_entries (key, kind, value, expires_at) VALUES (?, ?, ?, ?)
                     ON CONFLICT(key) DO UPDATE SET
                        kind = excluded.kind,
                        value = excluded.value,
                        expires_at = excluded.expires_at",
                )
                .bind(key)
                .bind(KIND_STRING)
                .bind(value)
                .bind(now + i64::from(*ttl_secs) * 1000)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
                Ok(true)
            }
            StoreOp::SetFields { key, fields } => {
                let existing = sqlx::query_as::<_, EntryRow>(
                    "SELECT kind, value, expires_at FROM kv_entries WHERE key = ?",
                )
                .bind(key)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_error)?;

                let (mut map, expires_at) = match existing {
                    Some((kind, value, expires_at)) if kind == KIND_HASH => {
                        (serde_json::from_str::<HashMap<String, String>>(&value)?, expires_at)
                    }
                    Some(_) => return Err(wrong_type(key)),
                    None => (HashMap::new(), None),
                };
                for (field, value) in fields {
                    map.insert(field.clone(), value.clone());
                }

                sqlx::query(
                    "INSERT INTO kv_entries (key, kind, value, expires_at) VALUES (?, ?, ?, ?)
                     ON CONFLICT(key) DO UPDATE SET
                        kind = excluded.kind,
                        value = excluded.value,
                        expires_at = excluded.expires_at",
                )
                .bind(key)
                .bind(KIND_HASH)
                .bind(serde_json::to_string(&map)?)
                .bind(expires_at)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
                Ok(true)
            }
            StoreOp::Expire { key, ttl_secs } => {
                let result = sqlx::query("UPDATE kv_entries SET expires_at = ? WHERE key = ?")
                    .bind(now + i64::from(*ttl_secs) * 1000)
                    .bind(key)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?;
                Ok(result.rows_affected() > 0)
            }
            StoreOp::Delete { key } => {
                let result = sqlx::query("DELETE FROM kv_entries WHERE key = ?")
                    .bind(key)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?;
                Ok(result.rows_affected() > 0)
            }
        }
    }

    async fn run_one(&self, op: StoreOp) -> Result<bool, DomainError> {
        let touched = self.run_batch(std::slice::from_ref(&op)).await?;
        Ok(touched.first().copied().unwrap_or(false))
    }
}

#[async_trait]
impl CacheStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        match Self::fetch_live(&self.pool, key, now_ms()).await? {
            Some((kind, value, _)) if kind == KIND_STRING => Ok(Some(value)),
            Some(_) => Err(wrong_type(key)),
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
        match Self::fetch_live(&self.pool, key, now_ms()).await? {
            Some((kind, value, _)) if kind == KIND_HASH => Ok(serde_json::from_str(&value)?),
            Some(_) => Err(wrong_type(key)),
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
        let now = now_ms();
        Ok(match Self::fetch_live(&self.pool, key, now).await? {
            None => KeyExpiry::Missing,
            Some((_, _, None)) => KeyExpiry::NoExpiry,
            Some((_, _, Some(expires_at))) => {
                KeyExpiry::Remaining(remaining_secs(expires_at - now))
            }
        })
    }

    #[instrument(skip(self, ops), fields(ops = ops.len()))]
    async fn apply_atomic(&self, ops: Vec<StoreOp>) -> Result<(), DomainError> {
        self.run_batch(&ops).await.map(|_| ())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn wrong_type(key: &str) -> DomainError {
    DomainError::StoreError(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

fn db_error(e: sqlx::Error) -> DomainError {
    error!(error = %e, "SQLite store operation failed");
    DomainError::StoreError(e.to_string())
}
