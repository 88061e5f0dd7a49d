//! Watchlist partition and per-category selection of non-watchlist alerts.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use alert_core::{Alert, AlertCategory, Severity};

use crate::engine::AlertConfig;
use crate::priority::sort_by_priority;

/// Reduce the full candidate list to at most `max_alerts` entries.
///
/// Watchlist alerts always lead, in extraction order, and are only
/// priority-sorted when they alone exceed the cap. Remaining capacity is
/// filled from the other tickers: per category, at most the top
/// `category_type_cap` success and worst `category_type_cap` danger
/// candidates survive, then the pool is priority-sorted and trimmed.
/// `warning`/`info` candidates never make it out of the non-watchlist pool.
pub fn select_prioritized(
    alerts: Vec<Alert>,
    watchlist: &HashSet<String>,
    config: &AlertConfig,
) -> Vec<Alert> {
    let (mut user_alerts, non_user_alerts): (Vec<Alert>, Vec<Alert>) = alerts
        .into_iter()
        .partition(|a| watchlist.contains(&a.ticker));

    if user_alerts.len() >= config.max_alerts {
        sort_by_priority(&mut user_alerts);
        user_alerts.truncate(config.max_alerts);
        return user_alerts;
    }

    let remaining_capacity = config.max_alerts - user_alerts.len();

    let mut by_category: HashMap<AlertCategory, Vec<Alert>> = HashMap::new();
    for alert in non_user_alerts {
        by_category.entry(alert.category).or_default().push(alert);
    }

    let mut selected = Vec::new();
    for category in AlertCategory::ALL {
        let Some(mut bucket) = by_category.remove(&category) else {
            continue;
        };
        bucket.sort_by(compare_extremes);

        let mut success_taken = 0;
        let mut danger_taken = 0;
        for alert in bucket {
            match alert.severity {
                Severity::Success if success_taken < config.category_type_cap => {
                    success_taken += 1;
                    selected.push(alert);
                }
                Severity::Danger if danger_taken < config.category_type_cap => {
                    danger_taken += 1;
                    selected.push(alert);
                }
                _ => {}
            }
        }
    }

    sort_by_priority(&mut selected);
    selected.truncate(remaining_capacity);

    user_alerts.extend(selected);
    user_alerts
}

/// Within one category: every `success` before every `danger`, best
/// success first (descending value), worst danger first (ascending value).
/// `warning`/`info` sink to the back; the selection loop skips them anyway.
fn compare_extremes(a: &Alert, b: &Alert) -> Ordering {
    fn type_order(severity: Severity) -> u8 {
        match severity {
            Severity::Success => 0,
            Severity::Danger => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }

    type_order(a.severity)
        .cmp(&type_order(b.severity))
        .then_with(|| match a.severity {
            Severity::Success => b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal),
            Severity::Danger => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        })
}
