use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-ticker quote snapshot from the market-data feed.
///
/// Every numeric field is optional: a missing field suppresses the alert
/// rules that need it instead of raising an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerMetrics {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub open_price: Option<f64>,
    /// Previous trading day's close.
    #[serde(default)]
    pub prev_close: Option<f64>,
    #[serde(default)]
    pub ma_5: Option<f64>,
    #[serde(default)]
    pub ma_20: Option<f64>,
    #[serde(default)]
    pub avg_volume_10d: Option<f64>,
    /// Live session volume. Feeds do not populate this yet.
    #[serde(default)]
    pub current_volume: Option<f64>,
    #[serde(default)]
    pub high_10d: Option<f64>,
    #[serde(default)]
    pub low_10d: Option<f64>,
    #[serde(default)]
    pub last_price: Option<f64>,
}

impl TickerMetrics {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            open_price: None,
            prev_close: None,
            ma_5: None,
            ma_20: None,
            avg_volume_10d: None,
            current_volume: None,
            high_10d: None,
            low_10d: None,
            last_price: None,
        }
    }
}

/// Severity of an alert, used both for display styling and for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Success,
    Info,
}

impl Severity {
    /// Numeric rank for the priority sort (higher sorts first).
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Danger => 3,
            Severity::Warning => 2,
            Severity::Success => 1,
            Severity::Info => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
        }
    }
}

/// Rule family an alert belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertCategory {
    Gap,
    Crossover,
    Volume,
    Breakout,
    YearlyRange,
}

impl AlertCategory {
    /// All categories, in the order the selector walks them.
    pub const ALL: [AlertCategory; 5] = [
        AlertCategory::Gap,
        AlertCategory::Crossover,
        AlertCategory::Volume,
        AlertCategory::Breakout,
        AlertCategory::YearlyRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Gap => "gap",
            AlertCategory::Crossover => "crossover",
            AlertCategory::Volume => "volume",
            AlertCategory::Breakout => "breakout",
            AlertCategory::YearlyRange => "yearlyRange",
        }
    }
}

/// A market alert produced for one ticker by one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Deterministic id, `<ticker>-<rule discriminator>` (e.g. `PETR4-gap`).
    pub id: String,
    pub ticker: String,
    pub severity: Severity,
    /// Display text embedding ticker, name and the computed percentage.
    pub message: String,
    pub category: AlertCategory,
    /// Signed ranking magnitude (percent or ratio). The priority sort
    /// compares absolute values; the sign matters inside a category.
    pub value: f64,
}

/// Append-only record of an alert a user dismissed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenAlert {
    pub user_id: String,
    pub ticker: String,
    pub severity: Severity,
    pub message: String,
    pub seen_at: DateTime<Utc>,
}
