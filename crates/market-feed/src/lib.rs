//! HTTP client for the quote-snapshot feed.
//!
//! Maps the feed's JSON rows into [`TickerMetrics`]; absent numeric fields
//! come through as `None` so the engine can skip the affected rules.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use alert_core::{AlertError, MarketDataProvider, TickerMetrics};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-window rate limiter: at most `max_requests` per `window`.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            let wait_until = ts.front().unwrap().checked_add(self.window).unwrap();
            let sleep_dur = wait_until.duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for a feed slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// One quote row as the feed serves it.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    prev_close: Option<f64>,
    #[serde(default)]
    ma5: Option<f64>,
    #[serde(default)]
    ma20: Option<f64>,
    #[serde(default)]
    avg_volume_10d: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    high_10d: Option<f64>,
    #[serde(default)]
    low_10d: Option<f64>,
    #[serde(default)]
    last: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    results: Vec<SnapshotRow>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<SnapshotRow> for TickerMetrics {
    fn from(row: SnapshotRow) -> Self {
        let name = row.name.unwrap_or_else(|| row.symbol.clone());
        TickerMetrics {
            ticker: row.symbol,
            name,
            open_price: row.open,
            prev_close: row.prev_close,
            ma_5: row.ma5,
            ma_20: row.ma20,
            avg_volume_10d: row.avg_volume_10d,
            current_volume: row.volume,
            high_10d: row.high_10d,
            low_10d: row.low_10d,
            last_price: row.last,
        }
    }
}

#[derive(Clone)]
pub struct FeedClient {
    base_url: String,
    api_key: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        // Free-tier feeds should set FEED_RATE_LIMIT accordingly.
        let rate_limit: usize = std::env::var("FEED_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AlertError> {
        let request = builder
            .build()
            .map_err(|e| AlertError::Feed(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| AlertError::Feed("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| AlertError::Feed(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 10u64;
            tracing::warn!(
                "Feed 429 rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(AlertError::Feed(
            "Rate limited by feed after 3 retries".to_string(),
        ))
    }

    /// Latest snapshot for every tracked ticker.
    pub async fn get_snapshots(&self) -> Result<Vec<TickerMetrics>, AlertError> {
        let url = format!("{}/v1/snapshots", self.base_url);

        let response = self
            .send_request(self.client.get(&url).query(&[("apiKey", &self.api_key)]))
            .await?;

        if !response.status().is_success() {
            return Err(AlertError::Feed(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let snapshot: SnapshotResponse = response
            .json()
            .await
            .map_err(|e| AlertError::Feed(e.to_string()))?;

        if let Some(updated_at) = snapshot.updated_at {
            tracing::debug!("Feed snapshot timestamped {}", updated_at);
        }

        Ok(snapshot.results.into_iter().map(Into::into).collect())
    }

    /// Snapshot for a single ticker.
    pub async fn get_snapshot(&self, ticker: &str) -> Result<Option<TickerMetrics>, AlertError> {
        let url = format!("{}/v1/snapshots/{}", self.base_url, ticker);

        let response = self
            .send_request(self.client.get(&url).query(&[("apiKey", &self.api_key)]))
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AlertError::Feed(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let row: SnapshotRow = response
            .json()
            .await
            .map_err(|e| AlertError::Feed(e.to_string()))?;

        Ok(Some(row.into()))
    }
}

#[async_trait]
impl MarketDataProvider for FeedClient {
    async fn snapshots(&self) -> Result<Vec<TickerMetrics>, AlertError> {
        self.get_snapshots().await
    }
}
