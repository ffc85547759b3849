//! Append-only conversion log, backed by SQLite.
//!
//! Front doors record each conversion outcome after packaging. Recording is
//! best-effort: a log failure must never mask the conversion result already
//! determined, so callers log-and-swallow [`LogError`] instead of
//! propagating it.
//!
//! Rows are never updated or deleted; the read side is a filtered list and
//! one aggregate query.

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

/// Errors from the log store. Swallowed (logged only) by front doors.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("conversion log database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome recorded for one conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Success,
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Success => "success",
            RecordStatus::Error => "error",
        }
    }
}

/// One row of the conversion log.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversionRecord {
    pub id: i64,
    pub account: String,
    pub title: String,
    pub page_count: i64,
    pub destination_url: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: String,
}

/// Aggregate counters over the log.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversionTotals {
    pub total: i64,
    pub success: i64,
    pub errors: i64,
    pub total_pages: i64,
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS conversions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account TEXT NOT NULL,
    title TEXT NOT NULL,
    page_count INTEGER NOT NULL,
    destination_url TEXT,
    status TEXT NOT NULL,
    error_message TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_conversions_account ON conversions(account);
CREATE INDEX IF NOT EXISTS idx_conversions_created_at ON conversions(created_at DESC);
"#;

/// Handle over the append-only `conversions` table.
#[derive(Debug, Clone)]
pub struct ConversionLog {
    pool: SqlitePool,
}

impl ConversionLog {
    /// Open (creating if missing) the database at `database_url` and
    /// initialise the schema.
    pub async fn connect(database_url: &str) -> Result<Self, LogError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, initialising the schema.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, LogError> {
        sqlx::query(SCHEMA_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Append one conversion record; returns its id.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        account: &str,
        title: &str,
        page_count: usize,
        destination_url: Option<&str>,
        status: RecordStatus,
        error_message: Option<&str>,
    ) -> Result<i64, LogError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO conversions (account, title, page_count, destination_url, status, error_message)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(account)
        .bind(title)
        .bind(page_count as i64)
        .bind(destination_url)
        .bind(status.as_str())
        .bind(error_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Most recent records, optionally filtered by account.
    pub async fn list(
        &self,
        account: Option<&str>,
        limit: i64,
    ) -> Result<Vec<ConversionRecord>, LogError> {
        let records = match account {
            Some(account) => {
                sqlx::query_as::<_, ConversionRecord>(
                    r#"
                    SELECT id, account, title, page_count, destination_url,
                           status, error_message, created_at
                    FROM conversions
                    WHERE account = ?
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                )
                .bind(account)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ConversionRecord>(
                    r#"
                    SELECT id, account, title, page_count, destination_url,
                           status, error_message, created_at
                    FROM conversions
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    /// Aggregate totals, optionally filtered by account.
    pub async fn stats(&self, account: Option<&str>) -> Result<ConversionTotals, LogError> {
        const SELECT: &str = r#"
            SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN status = 'success' THEN 1 ELSE 0 END), 0) as success,
                COALESCE(SUM(CASE WHEN status = 'error' THEN 1 ELSE 0 END), 0) as errors,
                COALESCE(SUM(page_count), 0) as total_pages
            FROM conversions
        "#;

        let totals = match account {
            Some(account) => {
                sqlx::query_as::<_, ConversionTotals>(&format!("{SELECT} WHERE account = ?"))
                    .bind(account)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, ConversionTotals>(SELECT)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pool with a single connection keeps the in-memory database shared
    /// across queries.
    async fn memory_log() -> ConversionLog {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        ConversionLog::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn record_and_list_round_trip() {
        let log = memory_log().await;

        let id = log
            .record(
                "obec-fm",
                "Zpravodaj 09/2025",
                24,
                Some("https://bucket.s3.amazonaws.com/obec-fm/zpravodaj/index.html"),
                RecordStatus::Success,
                None,
            )
            .await
            .unwrap();
        assert!(id > 0);

        let records = log.list(Some("obec-fm"), 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Zpravodaj 09/2025");
        assert_eq!(records[0].page_count, 24);
        assert_eq!(records[0].status, "success");
        assert!(records[0].error_message.is_none());
    }

    #[tokio::test]
    async fn list_filters_by_account_and_respects_limit() {
        let log = memory_log().await;
        for i in 0..5 {
            log.record("a", &format!("doc {i}"), 1, None, RecordStatus::Success, None)
                .await
                .unwrap();
        }
        log.record("b", "other", 1, None, RecordStatus::Success, None)
            .await
            .unwrap();

        assert_eq!(log.list(Some("a"), 3).await.unwrap().len(), 3);
        assert_eq!(log.list(Some("b"), 100).await.unwrap().len(), 1);
        assert_eq!(log.list(None, 100).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn stats_aggregate_by_status() {
        let log = memory_log().await;
        log.record("a", "ok1", 10, None, RecordStatus::Success, None)
            .await
            .unwrap();
        log.record("a", "ok2", 5, None, RecordStatus::Success, None)
            .await
            .unwrap();
        log.record("a", "bad", 0, None, RecordStatus::Error, Some("decode failed"))
            .await
            .unwrap();

        let totals = log.stats(Some("a")).await.unwrap();
        assert_eq!(totals.total, 3);
        assert_eq!(totals.success, 2);
        assert_eq!(totals.errors, 1);
        assert_eq!(totals.total_pages, 15);
    }

    #[tokio::test]
    async fn stats_on_empty_log_are_zero() {
        let log = memory_log().await;
        let totals = log.stats(None).await.unwrap();
        assert_eq!(totals.total, 0);
        assert_eq!(totals.total_pages, 0);
    }
}
