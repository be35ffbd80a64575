//! PostgreSQL grant collection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use granary_storage::{GrantCollection, GrantFilter, GrantRecord, StorageError, StoredGrant};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{PostgresConfig, is_valid_identifier};
use crate::{PgPool, mask_password};

/// PostgreSQL-backed [`GrantCollection`].
///
/// One row per grant: `(id uuid, key text unique, ts timestamptz,
/// expiration timestamptz, resource jsonb)`. The full record lives in the
/// `resource` document; `key` and `expiration` are lifted into columns so
/// the upsert can use `ON CONFLICT` and the sweep an index.
#[derive(Debug, Clone)]
pub struct PostgresGrantCollection {
    pool: Arc<PgPool>,
    table: String,
}

impl PostgresGrantCollection {
    /// Creates a collection over an existing connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured table name is not a bare SQL
    /// identifier.
    pub fn new(pool: Arc<PgPool>, config: &PostgresConfig) -> Result<Self, StorageError> {
        if !is_valid_identifier(&config.table_name) {
            return Err(StorageError::internal(format!(
                "invalid table name: {:?}",
                config.table_name
            )));
        }
        Ok(Self {
            pool,
            table: config.table_name.clone(),
        })
    }

    /// Creates a collection by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the configuration is
    /// invalid.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StorageError> {
        use sqlx_core::pool::PoolOptions;
        use sqlx_postgres::Postgres;

        info!(
            url = %mask_password(&config.url),
            pool_size = config.pool_size,
            "Connecting to PostgreSQL grant store"
        );

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await
            .map_err(map_sqlx_err)?;

        Self::new(Arc::new(pool), config)
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the grant table and its indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                key TEXT NOT NULL UNIQUE,
                ts TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                expiration TIMESTAMPTZ,
                resource JSONB NOT NULL
            )
            "#,
            table = self.table
        );
        query(&create_table)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        let create_expiration_idx = format!(
            "CREATE INDEX IF NOT EXISTS {table}_expiration_idx \
             ON {table} (expiration) WHERE expiration IS NOT NULL",
            table = self.table
        );
        query(&create_expiration_idx)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        let create_subject_idx = format!(
            "CREATE INDEX IF NOT EXISTS {table}_subject_idx \
             ON {table} ((resource->>'subjectId'))",
            table = self.table
        );
        query(&create_subject_idx)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        debug!(table = %self.table, "Grant table schema ensured");

        Ok(())
    }
}

#[async_trait]
impl GrantCollection for PostgresGrantCollection {
    async fn find_by_key(&self, key: &str) -> Result<Option<StoredGrant>, StorageError> {
        let sql = format!("SELECT id, resource FROM {} WHERE key = $1", self.table);
        let row: Option<(Uuid, serde_json::Value)> = query_as(&sql)
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        row.map(row_to_stored).transpose()
    }

    async fn find_all(&self, filter: &GrantFilter) -> Result<Vec<StoredGrant>, StorageError> {
        let (where_clause, binds) = filter_clause(filter);
        let sql = format!("SELECT id, resource FROM {}{}", self.table, where_clause);

        let mut q = query_as(&sql);
        for value in &binds {
            q = q.bind(*value);
        }
        let rows: Vec<(Uuid, serde_json::Value)> = q
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        rows.into_iter().map(row_to_stored).collect()
    }

    async fn upsert(&self, record: &GrantRecord) -> Result<StoredGrant, StorageError> {
        let resource = serde_json::to_value(record)?;
        let sql = format!(
            r#"
            INSERT INTO {table} (id, key, ts, expiration, resource)
            VALUES ($1, $2, NOW(), $3, $4)
            ON CONFLICT (key) DO UPDATE
            SET resource = EXCLUDED.resource,
                expiration = EXCLUDED.expiration,
                ts = NOW()
            RETURNING id, resource
            "#,
            table = self.table
        );

        // On conflict the existing row keeps its id; the freshly generated
        // one is only used for a first insert.
        let row: (Uuid, serde_json::Value) = query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&record.key)
            .bind(record.expiration)
            .bind(&resource)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        row_to_stored(row)
    }

    async fn delete_by_key(&self, key: &str) -> Result<u64, StorageError> {
        let sql = format!("DELETE FROM {} WHERE key = $1", self.table);
        let result = query(&sql)
            .bind(key)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self, filter: &GrantFilter) -> Result<u64, StorageError> {
        let (where_clause, binds) = filter_clause(filter);
        let sql = format!("DELETE FROM {}{}", self.table, where_clause);

        let mut q = query(&sql);
        for value in &binds {
            q = q.bind(*value);
        }
        let result = q.execute(self.pool.as_ref()).await.map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, cutoff: OffsetDateTime) -> Result<u64, StorageError> {
        let sql = format!(
            "DELETE FROM {} WHERE expiration IS NOT NULL AND expiration < $1",
            self.table
        );
        let result = query(&sql)
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn truncate(&self) -> Result<u64, StorageError> {
        let sql = format!("DELETE FROM {}", self.table);
        let result = query(&sql)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}

/// Builds the `WHERE` clause and bind list for a composite filter.
///
/// Classification fields are matched against the JSONB document, so the
/// clause stays valid for any combination of set components.
fn filter_clause(filter: &GrantFilter) -> (String, Vec<&str>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<&str> = Vec::new();

    if let Some(subject_id) = &filter.subject_id {
        binds.push(subject_id);
        clauses.push(format!("resource->>'subjectId' = ${}", binds.len()));
    }
    if let Some(client_id) = &filter.client_id {
        binds.push(client_id);
        clauses.push(format!("resource->>'clientId' = ${}", binds.len()));
    }
    if let Some(grant_type) = &filter.grant_type {
        binds.push(grant_type);
        clauses.push(format!("resource->>'type' = ${}", binds.len()));
    }

    if clauses.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), binds)
    }
}

fn row_to_stored((id, resource): (Uuid, serde_json::Value)) -> Result<StoredGrant, StorageError> {
    let record: GrantRecord = serde_json::from_value(resource)?;
    Ok(StoredGrant { id, record })
}

fn map_sqlx_err(err: sqlx_core::Error) -> StorageError {
    match err {
        sqlx_core::Error::Io(_)
        | sqlx_core::Error::Tls(_)
        | sqlx_core::Error::PoolTimedOut
        | sqlx_core::Error::PoolClosed
        | sqlx_core::Error::WorkerCrashed => StorageError::connection(err.to_string()),
        other => StorageError::internal(other.to_string()),
    }
}
