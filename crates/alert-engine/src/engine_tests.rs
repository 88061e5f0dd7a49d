use std::collections::HashSet;

use alert_core::{Severity, TickerMetrics};

use crate::engine::AlertEngine;

fn snapshot(ticker: &str) -> TickerMetrics {
    TickerMetrics::new(ticker, format!("{} SA", ticker))
}

fn follow(tickers: &[&str]) -> HashSet<String> {
    tickers.iter().map(|t| t.to_string()).collect()
}

/// 12 tickers: 3 watchlist tickers each firing one crossover danger, 9
/// others spread across every category with mixed severities.
fn scenario() -> (Vec<TickerMetrics>, HashSet<String>) {
    let mut w1 = snapshot("W1");
    w1.ma_5 = Some(99.5);
    w1.ma_20 = Some(100.0);
    let mut w2 = snapshot("W2");
    w2.ma_5 = Some(99.5);
    w2.ma_20 = Some(100.0);
    let mut w3 = snapshot("W3");
    w3.ma_5 = Some(99.5);
    w3.ma_20 = Some(100.0);

    // Gap warnings: never selected from the non-watchlist pool.
    let mut g1 = snapshot("G1");
    g1.open_price = Some(105.0);
    g1.prev_close = Some(100.0);
    let mut g2 = snapshot("G2");
    g2.open_price = Some(96.0);
    g2.prev_close = Some(100.0);

    // Volume warning, same fate.
    let mut v1 = snapshot("V1");
    v1.avg_volume_10d = Some(1_000_000.0);
    v1.current_volume = Some(4_000_000.0);

    let mut c1 = snapshot("C1");
    c1.ma_5 = Some(100.9);
    c1.ma_20 = Some(100.0);
    let mut c2 = snapshot("C2");
    c2.ma_5 = Some(99.2);
    c2.ma_20 = Some(100.0);

    let mut b1 = snapshot("B1");
    b1.last_price = Some(104.0);
    b1.high_10d = Some(100.0);
    let mut b2 = snapshot("B2");
    b2.last_price = Some(102.0);
    b2.high_10d = Some(100.0);
    let mut b3 = snapshot("B3");
    b3.last_price = Some(85.0);
    b3.low_10d = Some(100.0);

    let mut y1 = snapshot("Y1");
    y1.last_price = Some(120.0);
    y1.high_10d = Some(100.0);

    // Watchlist tickers interleaved with the rest on purpose.
    let metrics = vec![g1, w1, c1, b1, w2, b2, v1, y1, b3, w3, c2, g2];
    (metrics, follow(&["W1", "W2", "W3"]))
}

#[test]
fn end_to_end_scenario_fills_exactly_ten() {
    let engine = AlertEngine::new();
    let (metrics, watchlist) = scenario();

    let out = engine.run(&metrics, &watchlist);
    assert_eq!(out.len(), 10);

    // Watchlist alerts first, in ticker-iteration order, unsorted.
    assert_eq!(out[0].id, "W1-crossover");
    assert_eq!(out[1].id, "W2-crossover");
    assert_eq!(out[2].id, "W3-crossover");
    assert!(out[..3].iter().all(|a| a.severity == Severity::Danger));

    // Non-watchlist tail in priority order: dangers by magnitude, then
    // successes by magnitude. B2 lost the per-category success cap; the
    // gap/volume warnings never qualify.
    let tail: Vec<&str> = out[3..].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        tail,
        vec![
            "B3-low-10d",
            "B3-52w-low",
            "C2-crossover",
            "Y1-high-10d",
            "Y1-52w-high",
            "B1-high-10d",
            "C1-crossover",
        ]
    );
}

#[test]
fn repeated_runs_are_deterministic() {
    let engine = AlertEngine::new();
    let (metrics, watchlist) = scenario();

    let first: Vec<String> = engine
        .run(&metrics, &watchlist)
        .into_iter()
        .map(|a| a.id)
        .collect();
    for _ in 0..3 {
        let again: Vec<String> = engine
            .run(&metrics, &watchlist)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn empty_inputs() {
    let engine = AlertEngine::new();

    assert!(engine.run(&[], &HashSet::new()).is_empty());
    assert!(engine.run(&[], &follow(&["W1"])).is_empty());

    // Empty watchlist still yields the categorized non-user selection.
    let (metrics, _) = scenario();
    let out = engine.run(&metrics, &HashSet::new());
    assert!(!out.is_empty());
    assert!(out.iter().all(|a| a.severity != Severity::Warning));
}

#[test]
fn output_is_bounded_for_any_input_size() {
    let engine = AlertEngine::new();

    let mut metrics = Vec::new();
    for i in 0..200 {
        let mut m = snapshot(&format!("T{i}"));
        m.last_price = Some(100.0 + i as f64);
        m.high_10d = Some(50.0);
        m.ma_5 = Some(99.5);
        m.ma_20 = Some(100.0);
        metrics.push(m);
    }

    let out = engine.run(&metrics, &HashSet::new());
    assert!(out.len() <= 10);

    // A large watchlist is capped too.
    let all: HashSet<String> = metrics.iter().map(|m| m.ticker.clone()).collect();
    let out = engine.run(&metrics, &all);
    assert_eq!(out.len(), 10);
}
