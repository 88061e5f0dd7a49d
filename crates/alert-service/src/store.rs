//! SQLite-backed watchlist and seen-alert collaborators.

use alert_core::{AlertError, SeenAlert, SeenAlertStore, WatchlistProvider};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Create the tables this crate needs, if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS watchlist_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            ticker TEXT NOT NULL,
            added_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, ticker)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seen_alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            ticker TEXT NOT NULL,
            severity TEXT NOT NULL,
            message TEXT NOT NULL,
            seen_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Watchlist store keyed by (user, ticker).
pub struct SqliteWatchlist {
    pool: SqlitePool,
}

impl SqliteWatchlist {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add_ticker(&self, user_id: &str, ticker: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO watchlist_items (user_id, ticker)
            VALUES (?, ?)
            "#,
        )
        .bind(user_id)
        .bind(ticker)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_ticker(&self, user_id: &str, ticker: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM watchlist_items
            WHERE user_id = ? AND ticker = ?
            "#,
        )
        .bind(user_id)
        .bind(ticker)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl WatchlistProvider for SqliteWatchlist {
    async fn watchlist(&self, user_id: &str) -> Result<Vec<String>, AlertError> {
        let tickers: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT ticker FROM watchlist_items
            WHERE user_id = ?
            ORDER BY added_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AlertError::Store(e.to_string()))?;

        Ok(tickers)
    }
}

/// Append-only log of dismissed alerts.
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeenAlertStore for SqliteSeenStore {
    async fn record_seen(&self, seen: &SeenAlert) -> Result<(), AlertError> {
        sqlx::query(
            r#"
            INSERT INTO seen_alerts (user_id, ticker, severity, message, seen_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&seen.user_id)
        .bind(&seen.ticker)
        .bind(seen.severity.as_str())
        .bind(&seen.message)
        .bind(seen.seen_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AlertError::Store(e.to_string()))?;

        Ok(())
    }
}
