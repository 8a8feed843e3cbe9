use async_trait::async_trait;
use jiff::Timestamp;
use keyhole_core::store::{Result, UrlStore};
use keyhole_core::{StorageError, UrlMapping};
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the store contract.
///
/// One row per original URL in `shortened_urls`, guaranteed by a UNIQUE
/// index on `original_url`; the same index serves the exact-match lookup.
/// The AUTO_INCREMENT `id` column is the surrogate key and never leaves
/// this layer. `created_at` is stored as Unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl UrlStore for MySqlStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, short_url, created_at
            FROM shortened_urls
            WHERE original_url = ?
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let short_url: String = row.try_get("short_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let created_at = parse_created_at(created_at_raw)?;

        Ok(Some(UrlMapping {
            original_url,
            short_url,
            created_at,
        }))
    }

    async fn insert(&self, mapping: &UrlMapping) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO shortened_urls (original_url, short_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&mapping.original_url)
        .bind(&mapping.short_url)
        .bind(mapping.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(mapping.original_url.clone()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
