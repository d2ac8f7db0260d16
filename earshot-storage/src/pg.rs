//! Pooled Postgres record store.
//!
//! All reads are parameterized statements over the single `feedback` relation;
//! the one write path is the insert. ID and creation-timestamp assignment is
//! delegated to the database (`BIGSERIAL` plus a `now()` default), which keeps
//! both monotonic per insertion order.

use crate::FeedbackStore;
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use earshot_core::{
    DbConfig, EarshotResult, FeedbackRecord, NewRecord, Priority, Sentiment, StoreError, Timestamp,
};
use tokio_postgres::{NoTls, Row};

/// Schema for the feedback relation. Applied idempotently at startup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS feedback (
    feedback_id  BIGSERIAL PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT,
    source       TEXT NOT NULL,
    user_id      TEXT,
    sentiment    TEXT NOT NULL DEFAULT 'unset',
    category     TEXT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    resolved_at  TIMESTAMPTZ,
    priority     TEXT NOT NULL DEFAULT 'medium'
);
CREATE INDEX IF NOT EXISTS feedback_created_at_idx ON feedback (created_at DESC);
CREATE INDEX IF NOT EXISTS feedback_unresolved_idx ON feedback (created_at)
    WHERE resolved_at IS NULL;
";

const COLUMNS: &str =
    "feedback_id, title, description, source, user_id, sentiment, category, created_at, resolved_at, priority";

/// Create a connection pool from configuration.
pub fn create_pool(config: &DbConfig) -> EarshotResult<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.dbname = Some(config.dbname.clone());
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let mut pool_config = PoolConfig::new(config.max_size);
    pool_config.timeouts = Timeouts {
        wait: Some(config.timeout),
        create: Some(config.timeout),
        recycle: None,
    };
    cfg.pool = Some(pool_config);

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| StoreError::ConnectionFailed {
            reason: format!("failed to create pool: {}", e),
        })?;

    Ok(pool)
}

/// Record store backed by a pooled Postgres connection.
#[derive(Clone)]
pub struct PgFeedbackStore {
    pool: Pool,
}

impl PgFeedbackStore {
    /// Create a store over an existing pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &DbConfig) -> EarshotResult<Self> {
        Ok(Self::new(create_pool(config)?))
    }

    /// Current pool size, for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Apply the feedback schema if it does not exist yet.
    pub async fn ensure_schema(&self) -> EarshotResult<()> {
        let conn = self.conn().await?;
        conn.batch_execute(SCHEMA)
            .await
            .map_err(|e| StoreError::QueryFailed {
                view: "schema".to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn conn(&self) -> EarshotResult<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| {
                StoreError::ConnectionFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }

    async fn query_records(
        &self,
        view: &str,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> EarshotResult<Vec<FeedbackRecord>> {
        let conn = self.conn().await?;
        let rows = conn
            .query(statement, params)
            .await
            .map_err(|e| StoreError::QueryFailed {
                view: view.to_string(),
                reason: e.to_string(),
            })?;
        rows.iter().map(row_to_record).collect()
    }
}

fn get_column<'a, T>(row: &'a Row, column: &str) -> Result<T, StoreError>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column).map_err(|e| StoreError::DecodeFailed {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

fn row_to_record(row: &Row) -> EarshotResult<FeedbackRecord> {
    let sentiment: String = get_column(row, "sentiment")?;
    let priority: String = get_column(row, "priority")?;

    Ok(FeedbackRecord {
        feedback_id: get_column(row, "feedback_id")?,
        title: get_column(row, "title")?,
        description: get_column(row, "description")?,
        source: get_column(row, "source")?,
        user_id: get_column(row, "user_id")?,
        sentiment: Sentiment::from_db_str(&sentiment),
        category: get_column(row, "category")?,
        created_at: get_column(row, "created_at")?,
        resolved_at: get_column(row, "resolved_at")?,
        priority: Priority::from_db_str(&priority),
    })
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn insert(&self, record: NewRecord) -> EarshotResult<FeedbackRecord> {
        let conn = self.conn().await?;
        let statement = format!(
            "INSERT INTO feedback (title, description, source, user_id, sentiment, category, priority) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            COLUMNS
        );

        let row = conn
            .query_one(
                statement.as_str(),
                &[
                    &record.title,
                    &record.description,
                    &record.source,
                    &record.user_id,
                    &record.sentiment.as_db_str(),
                    &record.category,
                    &record.priority.as_db_str(),
                ],
            )
            .await
            .map_err(|e| StoreError::InsertFailed {
                reason: e.to_string(),
            })?;

        row_to_record(&row)
    }

    async fn fetch_all(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        let statement = format!("SELECT {} FROM feedback ORDER BY feedback_id", COLUMNS);
        self.query_records("all", &statement, &[]).await
    }

    async fn fetch_unresolved(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        let statement = format!(
            "SELECT {} FROM feedback WHERE resolved_at IS NULL ORDER BY feedback_id",
            COLUMNS
        );
        self.query_records("unresolved", &statement, &[]).await
    }

    async fn fetch_recent(&self, limit: usize) -> EarshotResult<Vec<FeedbackRecord>> {
        let statement = format!(
            "SELECT {} FROM feedback ORDER BY created_at DESC LIMIT $1",
            COLUMNS
        );
        self.query_records("recent", &statement, &[&(limit as i64)])
            .await
    }

    async fn fetch_created_since(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> EarshotResult<Vec<FeedbackRecord>> {
        let statement = format!(
            "SELECT {} FROM feedback WHERE created_at >= $1 ORDER BY created_at DESC LIMIT $2",
            COLUMNS
        );
        self.query_records("created-since", &statement, &[&cutoff, &(limit as i64)])
            .await
    }

    async fn count(&self) -> EarshotResult<i64> {
        let conn = self.conn().await?;
        let row = conn
            .query_one("SELECT count(*) FROM feedback", &[])
            .await
            .map_err(|e| StoreError::QueryFailed {
                view: "count".to_string(),
                reason: e.to_string(),
            })?;
        row.try_get(0).map_err(|e| {
            StoreError::DecodeFailed {
                column: "count".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
