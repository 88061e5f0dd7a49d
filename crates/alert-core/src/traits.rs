use crate::{AlertError, SeenAlert, TickerMetrics};
use async_trait::async_trait;

/// Market-data fetch collaborator.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote snapshot for every tracked ticker.
    async fn snapshots(&self) -> Result<Vec<TickerMetrics>, AlertError>;
}

/// User-favorites collaborator.
#[async_trait]
pub trait WatchlistProvider: Send + Sync {
    /// Tickers the user follows. Empty when the user has none.
    async fn watchlist(&self, user_id: &str) -> Result<Vec<String>, AlertError>;
}

/// Persistence collaborator for dismissed alerts. Append-only.
#[async_trait]
pub trait SeenAlertStore: Send + Sync {
    async fn record_seen(&self, seen: &SeenAlert) -> Result<(), AlertError>;
}
