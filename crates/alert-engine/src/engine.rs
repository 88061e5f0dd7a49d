use std::collections::HashSet;

use alert_core::{Alert, TickerMetrics};

use crate::rules::generate_alerts;
use crate::selector::select_prioritized;

/// Upper bound on the list returned to the display layer.
pub const MAX_ALERTS: usize = 10;

/// Minimum absolute gap (open vs. previous close, percent) that fires the
/// gap rule. The boundary is inclusive.
pub const GAP_THRESHOLD_PCT: f64 = 2.0;

/// The crossover rule only fires while the 5-day and 20-day averages sit
/// within this percent window of each other ("crossed recently").
pub const CROSSOVER_WINDOW_PCT: f64 = 1.0;

/// Current volume over 10-day average volume must exceed this to fire.
pub const VOLUME_RATIO_THRESHOLD: f64 = 2.0;

/// Ratio used while the feed supplies no live volume field. At 1.0 the
/// volume rule cannot fire; a real feed value replaces it per snapshot.
pub const PLACEHOLDER_VOLUME_RATIO: f64 = 1.0;

/// Buffer applied to the 10-day range to simulate 52-week bounds until a
/// real yearly range is available from the feed.
pub const SIMULATED_YEARLY_RANGE_BUFFER: f64 = 0.1;

/// Per category, at most this many `success` and this many `danger`
/// candidates survive the non-watchlist selection.
pub const CATEGORY_TYPE_CAP: usize = 2;

/// Thresholds and caps for one engine instance.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub max_alerts: usize,
    pub gap_threshold_pct: f64,
    pub crossover_window_pct: f64,
    pub volume_ratio_threshold: f64,
    pub yearly_range_buffer: f64,
    pub category_type_cap: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            max_alerts: MAX_ALERTS,
            gap_threshold_pct: GAP_THRESHOLD_PCT,
            crossover_window_pct: CROSSOVER_WINDOW_PCT,
            volume_ratio_threshold: VOLUME_RATIO_THRESHOLD,
            yearly_range_buffer: SIMULATED_YEARLY_RANGE_BUFFER,
            category_type_cap: CATEGORY_TYPE_CAP,
        }
    }
}

/// Facade over the three pure stages.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    config: AlertConfig,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self {
            config: AlertConfig::default(),
        }
    }

    pub fn with_config(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Full pass: extract every candidate, then select the bounded,
    /// watchlist-first list for display.
    pub fn run(&self, metrics: &[TickerMetrics], watchlist: &HashSet<String>) -> Vec<Alert> {
        let candidates = generate_alerts(metrics, &self.config);
        select_prioritized(candidates, watchlist, &self.config)
    }
}
