// tests/detection_scenarios.rs
//
// End-to-end aggregator scenarios: fixtures feed the public API only.
use candle_pattern_engine::{
    Candle, CandleWindow, Direction, EngineConfig, MarketRegime, PatternEngine, PatternId,
};
use chrono::{TimeZone, Utc};

fn candle(i: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    Candle {
        timestamp: Utc.timestamp_opt(i * 60, 0).unwrap(),
        open,
        high,
        low,
        close,
        volume,
    }
}

fn engine(min_confidence: f64, atr_period: usize) -> PatternEngine {
    PatternEngine::new(EngineConfig {
        min_confidence,
        atr_period,
        ..Default::default()
    })
    .unwrap()
}

/// Five lower closes, then a 10-point bearish candle fully engulfed by a
/// 15-point bullish candle on elevated volume.
fn engulfing_reversal_window() -> CandleWindow {
    CandleWindow::new(vec![
        candle(0, 120.0, 121.0, 117.5, 118.0, 1000.0),
        candle(1, 118.0, 119.0, 115.5, 116.0, 1000.0),
        candle(2, 116.0, 117.0, 113.5, 114.0, 1000.0),
        candle(3, 114.0, 115.0, 111.5, 112.0, 1000.0),
        candle(4, 112.0, 113.0, 109.5, 110.0, 1000.0),
        candle(5, 110.0, 110.5, 99.5, 100.0, 1000.0),
        candle(6, 99.0, 116.0, 98.5, 114.0, 1800.0),
    ])
    .unwrap()
}

#[test]
fn downtrend_engulfing_scores_above_five() {
    let engine = engine(5.0, 5);
    let window = engulfing_reversal_window();

    let results = engine.detect_patterns("BTCUSDT", &window, MarketRegime::Bullish, 114.0, 1000.0);
    let hit = results
        .iter()
        .find(|r| r.pattern == PatternId::BullishEngulfing)
        .expect("bullish engulfing should fire");

    assert_eq!(hit.direction, Direction::Bullish);
    assert!(hit.confidence > 5.0);
    assert!(hit.target_price > 114.0);
    assert!(hit.stop_price < 114.0);
    assert_eq!(hit.lookback_used, 2);
    assert_eq!(hit.symbol, "BTCUSDT");
}

#[test]
fn engulfing_contributes_every_weighted_subscore() {
    let engine = engine(0.0, 5);
    let window = engulfing_reversal_window();

    let results = engine.detect_patterns("BTCUSDT", &window, MarketRegime::Bullish, 114.0, 1000.0);
    let hit = results
        .iter()
        .find(|r| r.pattern == PatternId::BullishEngulfing)
        .unwrap();

    for key in ["body", "volume", "trend", "position", "regime"] {
        let score = hit.contributing_scores[key];
        assert!((0.0..=10.0).contains(&score), "{} out of bounds", key);
    }
    // Five straight lower closes make a perfect pre-pattern downtrend
    assert_eq!(hit.contributing_scores["trend"], 10.0);
}

#[test]
fn bearish_shape_never_triggers_the_bullish_detector() {
    let engine = engine(0.0, 3);
    // Uptrend, then a bullish candle engulfed by a larger bearish one
    let window = CandleWindow::new(vec![
        candle(0, 100.0, 101.5, 99.5, 101.0, 1000.0),
        candle(1, 101.0, 102.5, 100.5, 102.0, 1000.0),
        candle(2, 102.0, 103.5, 101.5, 103.0, 1000.0),
        candle(3, 103.0, 108.5, 102.5, 108.0, 1000.0),
        candle(4, 109.0, 109.5, 101.0, 102.0, 1400.0),
    ])
    .unwrap();

    let results = engine.detect_patterns("ETHUSDT", &window, MarketRegime::Bearish, 102.0, 1000.0);
    assert!(results
        .iter()
        .all(|r| r.pattern != PatternId::BullishEngulfing));
    assert!(results
        .iter()
        .any(|r| r.pattern == PatternId::BearishEngulfing));
}

#[test]
fn four_price_doji_fires_regardless_of_trend_direction() {
    let engine = engine(0.0, 3);

    let downtrend_then_doji = CandleWindow::new(vec![
        candle(0, 110.0, 110.5, 107.5, 108.0, 1000.0),
        candle(1, 108.0, 108.5, 105.5, 106.0, 1000.0),
        candle(2, 106.0, 106.5, 103.5, 104.0, 1000.0),
        candle(3, 104.0, 104.5, 101.5, 102.0, 1000.0),
        candle(4, 102.0, 102.0, 102.0, 102.0, 1000.0),
    ])
    .unwrap();

    let uptrend_then_doji = CandleWindow::new(vec![
        candle(0, 100.0, 102.5, 99.5, 102.0, 1000.0),
        candle(1, 102.0, 104.5, 101.5, 104.0, 1000.0),
        candle(2, 104.0, 106.5, 103.5, 106.0, 1000.0),
        candle(3, 106.0, 108.5, 105.5, 108.0, 1000.0),
        candle(4, 108.0, 108.0, 108.0, 108.0, 1000.0),
    ])
    .unwrap();

    for (window, regime) in [
        (&downtrend_then_doji, MarketRegime::Bullish),
        (&uptrend_then_doji, MarketRegime::Bearish),
    ] {
        let results = engine.detect_patterns("TEST", window, regime, 0.0, 1000.0);
        let doji = results
            .iter()
            .find(|r| r.pattern == PatternId::Doji)
            .expect("doji should fire on a four-price candle");
        assert_eq!(doji.direction, Direction::Neutral);
    }
}

#[test]
fn three_white_soldiers_scenario() {
    let engine = engine(0.0, 4);
    let window = CandleWindow::new(vec![
        candle(0, 116.0, 117.0, 113.5, 114.0, 1000.0),
        candle(1, 114.0, 115.0, 111.5, 112.0, 1000.0),
        candle(2, 112.0, 113.0, 109.5, 110.0, 1000.0),
        candle(3, 110.0, 111.0, 107.5, 108.0, 1000.0),
        candle(4, 108.0, 113.5, 107.5, 113.0, 1000.0),
        candle(5, 111.0, 117.5, 110.5, 117.0, 1100.0),
        candle(6, 115.0, 121.5, 114.5, 121.0, 1200.0),
    ])
    .unwrap();

    let results = engine.detect_patterns("SOL", &window, MarketRegime::Bullish, 121.0, 1000.0);
    let soldiers = results
        .iter()
        .find(|r| r.pattern == PatternId::ThreeWhiteSoldiers)
        .expect("three white soldiers should fire");
    assert_eq!(soldiers.direction, Direction::Bullish);
    assert_eq!(soldiers.lookback_used, 3);
}

#[test]
fn two_candle_window_skips_longer_patterns_without_error() {
    let engine = engine(0.0, 1);
    let window = CandleWindow::new(vec![
        candle(0, 100.0, 101.0, 99.0, 100.5, 1000.0),
        candle(1, 100.5, 101.5, 99.5, 101.0, 1000.0),
    ])
    .unwrap();

    // Must not panic and must not report any 3+ candle pattern
    let results = engine.detect_patterns("TEST", &window, MarketRegime::Neutral, 101.0, 1000.0);
    assert!(results.iter().all(|r| r.lookback_used <= 2));
}

#[test]
fn empty_window_yields_no_results() {
    let engine = engine(0.0, 14);
    let window = CandleWindow::new(Vec::new()).unwrap();
    let results = engine.detect_patterns("TEST", &window, MarketRegime::Neutral, 0.0, 0.0);
    assert!(results.is_empty());
}

#[test]
fn all_confidences_stay_within_bounds_and_sorted() {
    let engine = engine(0.0, 3);
    let windows = [
        engulfing_reversal_window(),
        CandleWindow::new(vec![
            candle(0, 110.0, 110.5, 107.5, 108.0, 900.0),
            candle(1, 108.0, 108.5, 105.5, 106.0, 1100.0),
            candle(2, 106.0, 106.5, 103.5, 104.0, 1300.0),
            candle(3, 104.0, 104.5, 101.5, 102.0, 1600.0),
            candle(4, 102.0, 104.3, 98.8, 103.5, 2500.0),
        ])
        .unwrap(),
    ];

    for window in &windows {
        for regime in [
            MarketRegime::Bullish,
            MarketRegime::Bearish,
            MarketRegime::Neutral,
        ] {
            let results = engine.detect_patterns("TEST", window, regime, 100.0, 1200.0);
            for result in &results {
                assert!((0.0..=10.0).contains(&result.confidence));
            }
            for pair in results.windows(2) {
                assert!(pair[0].confidence >= pair[1].confidence);
            }
        }
    }
}

#[test]
fn min_confidence_filters_weak_signals() {
    let window = engulfing_reversal_window();

    let permissive = engine(0.0, 5);
    let strict = engine(9.9, 5);

    let all = permissive.detect_patterns("TEST", &window, MarketRegime::Neutral, 114.0, 1000.0);
    let few = strict.detect_patterns("TEST", &window, MarketRegime::Neutral, 114.0, 1000.0);

    assert!(!all.is_empty());
    assert!(few.len() < all.len());
    assert!(few.iter().all(|r| r.confidence >= 9.9));
}

#[test]
fn disabled_pattern_is_never_reported() {
    let mut config = EngineConfig {
        min_confidence: 0.0,
        atr_period: 5,
        ..Default::default()
    };
    config.disabled_patterns.insert(PatternId::BullishEngulfing);
    let engine = PatternEngine::new(config).unwrap();

    let window = engulfing_reversal_window();
    let results = engine.detect_patterns("TEST", &window, MarketRegime::Bullish, 114.0, 1000.0);
    assert!(results
        .iter()
        .all(|r| r.pattern != PatternId::BullishEngulfing));
}
