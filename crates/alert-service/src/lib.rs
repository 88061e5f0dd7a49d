//! Composition root for the alert pipeline.
//!
//! Wires the market-data feed, the user watchlist, the pure engine and the
//! seen-alert store. The engine stays side-effect free; everything
//! stateful lives here.

pub mod store;

pub use store::{init_schema, SqliteSeenStore, SqliteWatchlist};

use std::collections::HashSet;
use std::sync::Arc;

use alert_core::{
    Alert, AlertError, MarketDataProvider, SeenAlert, SeenAlertStore, TickerMetrics,
    WatchlistProvider,
};
use alert_engine::AlertEngine;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

const SNAPSHOT_CACHE_KEY: &str = "latest";
const SNAPSHOT_CACHE_TTL_SECS: i64 = 60;

/// Environment-driven configuration for wiring a service instance.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub feed_base_url: String,
    pub feed_api_key: String,
}

impl ServiceConfig {
    /// Load from environment variables (reads `.env` first if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://alerts.db".to_string()),
            feed_base_url: std::env::var("FEED_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            feed_api_key: std::env::var("FEED_API_KEY").unwrap_or_default(),
        }
    }
}

struct CacheEntry {
    data: Vec<TickerMetrics>,
    cached_at: DateTime<Utc>,
}

pub struct AlertService {
    feed: Arc<dyn MarketDataProvider>,
    watchlists: Arc<dyn WatchlistProvider>,
    seen_store: Arc<dyn SeenAlertStore>,
    engine: AlertEngine,
    snapshot_cache: DashMap<&'static str, CacheEntry>,
}

impl AlertService {
    pub fn new(
        feed: Arc<dyn MarketDataProvider>,
        watchlists: Arc<dyn WatchlistProvider>,
        seen_store: Arc<dyn SeenAlertStore>,
    ) -> Self {
        Self {
            feed,
            watchlists,
            seen_store,
            engine: AlertEngine::new(),
            snapshot_cache: DashMap::new(),
        }
    }

    pub fn with_engine(mut self, engine: AlertEngine) -> Self {
        self.engine = engine;
        self
    }

    /// The bounded, prioritized alert list for one user.
    ///
    /// A failing watchlist lookup degrades to an empty watchlist rather
    /// than failing the whole request.
    pub async fn alerts_for_user(&self, user_id: &str) -> Result<Vec<Alert>, AlertError> {
        let metrics = self.cached_snapshots().await?;

        let watchlist: HashSet<String> = match self.watchlists.watchlist(user_id).await {
            Ok(tickers) => tickers.into_iter().collect(),
            Err(e) => {
                tracing::warn!("Watchlist unavailable for {}: {}", user_id, e);
                HashSet::new()
            }
        };

        let alerts = self.engine.run(&metrics, &watchlist);
        tracing::info!(
            "Generated {} alerts for {} from {} snapshots ({} followed tickers)",
            alerts.len(),
            user_id,
            metrics.len(),
            watchlist.len()
        );

        Ok(alerts)
    }

    /// Record a dismissal. The UI keeps working when this fails; the
    /// caller only gets a failure signal to surface.
    pub async fn dismiss(&self, user_id: &str, alert: &Alert) -> Result<(), AlertError> {
        let seen = SeenAlert {
            user_id: user_id.to_string(),
            ticker: alert.ticker.clone(),
            severity: alert.severity,
            message: alert.message.clone(),
            seen_at: Utc::now(),
        };

        if let Err(e) = self.seen_store.record_seen(&seen).await {
            tracing::warn!("Could not mark alert {} as seen: {}", alert.id, e);
            return Err(e);
        }

        tracing::debug!("Alert {} marked as seen by {}", alert.id, user_id);
        Ok(())
    }

    async fn cached_snapshots(&self) -> Result<Vec<TickerMetrics>, AlertError> {
        if let Some(entry) = self.snapshot_cache.get(SNAPSHOT_CACHE_KEY) {
            let age = Utc::now() - entry.cached_at;
            if age.num_seconds() < SNAPSHOT_CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let metrics = self.feed.snapshots().await?;
        self.snapshot_cache.insert(
            SNAPSHOT_CACHE_KEY,
            CacheEntry {
                data: metrics.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(metrics)
    }
}
