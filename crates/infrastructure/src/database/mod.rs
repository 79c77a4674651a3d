use ferrous_lookup_domain::config::StoreConfig;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

/// Opens the SQLite pool backing the key-value store and applies the
/// embedded migrations.
pub async fn create_pool(cfg: &StoreConfig) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = is_in_memory(&cfg.url);

    let mut options = SqliteConnectOptions::from_str(&cfg.url)?
        .create_if_missing(true)
        // Avoid SQLITE_BUSY errors under concurrent load
        .busy_timeout(Duration::from_secs(5));

    if !in_memory {
        options = options
            // WAL mode: readers and writers don't block each other
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    // Every connection to `:memory:` is a separate database, so keep one
    // connection alive for the pool's whole life.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .min_connections(1)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
