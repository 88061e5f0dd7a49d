//! Signal extraction: five independent heuristic rules per ticker.

use alert_core::{Alert, AlertCategory, Severity, TickerMetrics};

use crate::engine::{AlertConfig, PLACEHOLDER_VOLUME_RATIO};

/// Evaluate every rule against every snapshot and return the complete,
/// unfiltered candidate list. Pure; missing fields suppress the rule.
pub fn generate_alerts(metrics: &[TickerMetrics], config: &AlertConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for m in metrics {
        check_gap(m, config, &mut alerts);
        check_crossover(m, config, &mut alerts);
        check_volume(m, config, &mut alerts);
        check_breakout(m, &mut alerts);
        check_yearly_range(m, config, &mut alerts);
    }

    alerts
}

/// Opening gap vs. previous close, inclusive threshold.
fn check_gap(m: &TickerMetrics, config: &AlertConfig, out: &mut Vec<Alert>) {
    let (Some(open), Some(prev_close)) = (m.open_price, m.prev_close) else {
        return;
    };
    if prev_close == 0.0 {
        return;
    }

    let gap_pct = (open - prev_close) / prev_close * 100.0;
    if gap_pct.abs() >= config.gap_threshold_pct {
        out.push(Alert {
            id: format!("{}-gap", m.ticker),
            ticker: m.ticker.clone(),
            severity: Severity::Warning,
            message: format!(
                "{} ({}) opened {:+.2}% away from the previous close",
                m.ticker, m.name, gap_pct
            ),
            category: AlertCategory::Gap,
            value: gap_pct,
        });
    }
}

/// 5-day vs. 20-day moving-average crossover. Only fires while the two
/// averages sit within the crossover window of each other.
fn check_crossover(m: &TickerMetrics, config: &AlertConfig, out: &mut Vec<Alert>) {
    let (Some(ma_5), Some(ma_20)) = (m.ma_5, m.ma_20) else {
        return;
    };

    let crossover_pct = (ma_5 / ma_20 - 1.0) * 100.0;
    if crossover_pct.abs() >= config.crossover_window_pct {
        return;
    }

    if ma_5 > ma_20 {
        out.push(Alert {
            id: format!("{}-crossover", m.ticker),
            ticker: m.ticker.clone(),
            severity: Severity::Success,
            message: format!(
                "{} ({}): 5-day average crossed above the 20-day average ({:+.2}%)",
                m.ticker, m.name, crossover_pct
            ),
            category: AlertCategory::Crossover,
            value: crossover_pct,
        });
    } else if ma_5 < ma_20 {
        // Sign flipped so a deeper downward cross carries a larger value.
        out.push(Alert {
            id: format!("{}-crossover", m.ticker),
            ticker: m.ticker.clone(),
            severity: Severity::Danger,
            message: format!(
                "{} ({}): 5-day average crossed below the 20-day average ({:+.2}%)",
                m.ticker, m.name, crossover_pct
            ),
            category: AlertCategory::Crossover,
            value: -crossover_pct,
        });
    }
}

/// Volume anomaly vs. the 10-day average. Feeds do not populate live
/// volume yet, so the placeholder ratio keeps this rule dormant until one
/// does.
fn check_volume(m: &TickerMetrics, config: &AlertConfig, out: &mut Vec<Alert>) {
    let Some(avg_volume) = m.avg_volume_10d else {
        return;
    };
    if avg_volume <= 0.0 {
        return;
    }

    let ratio = match m.current_volume {
        Some(current) => current / avg_volume,
        None => PLACEHOLDER_VOLUME_RATIO,
    };

    if ratio > config.volume_ratio_threshold {
        out.push(Alert {
            id: format!("{}-volume", m.ticker),
            ticker: m.ticker.clone(),
            severity: Severity::Warning,
            message: format!(
                "{} ({}) trading at {:.2}x its 10-day average volume",
                m.ticker, m.name, ratio
            ),
            category: AlertCategory::Volume,
            value: ratio,
        });
    }
}

/// 10-day high/low breakout. Both sides may fire for the same ticker.
fn check_breakout(m: &TickerMetrics, out: &mut Vec<Alert>) {
    let Some(last) = m.last_price else {
        return;
    };

    if let Some(high) = m.high_10d {
        if last >= high {
            let pct = (last - high) / high * 100.0;
            out.push(Alert {
                id: format!("{}-high-10d", m.ticker),
                ticker: m.ticker.clone(),
                severity: Severity::Success,
                message: format!(
                    "{} ({}) broke above its 10-day high ({:+.2}%)",
                    m.ticker, m.name, pct
                ),
                category: AlertCategory::Breakout,
                value: pct,
            });
        }
    }

    if let Some(low) = m.low_10d {
        if last <= low {
            let pct = (last - low) / low * 100.0;
            out.push(Alert {
                id: format!("{}-low-10d", m.ticker),
                ticker: m.ticker.clone(),
                severity: Severity::Danger,
                message: format!(
                    "{} ({}) broke below its 10-day low ({:+.2}%)",
                    m.ticker, m.name, pct
                ),
                category: AlertCategory::Breakout,
                value: pct,
            });
        }
    }
}

/// 52-week range simulated from the 10-day range via the buffer constant.
fn check_yearly_range(m: &TickerMetrics, config: &AlertConfig, out: &mut Vec<Alert>) {
    let Some(last) = m.last_price else {
        return;
    };

    if let Some(high) = m.high_10d {
        let yearly_high = high * (1.0 + config.yearly_range_buffer);
        if last >= yearly_high {
            let pct = (last - yearly_high) / yearly_high * 100.0;
            out.push(Alert {
                id: format!("{}-52w-high", m.ticker),
                ticker: m.ticker.clone(),
                severity: Severity::Success,
                message: format!(
                    "{} ({}) trading at a new 52-week high ({:+.2}%)",
                    m.ticker, m.name, pct
                ),
                category: AlertCategory::YearlyRange,
                value: pct,
            });
        }
    }

    if let Some(low) = m.low_10d {
        let yearly_low = low * (1.0 - config.yearly_range_buffer);
        if last <= yearly_low {
            let pct = (last - yearly_low) / yearly_low * 100.0;
            out.push(Alert {
                id: format!("{}-52w-low", m.ticker),
                ticker: m.ticker.clone(),
                severity: Severity::Danger,
                message: format!(
                    "{} ({}) trading at a new 52-week low ({:+.2}%)",
                    m.ticker, m.name, pct
                ),
                category: AlertCategory::YearlyRange,
                value: pct,
            });
        }
    }
}
