// src/engine.rs
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{CandleWindow, MarketRegime, PatternResult};
use crate::patterns::{all_detectors, DetectionContext, PatternDetector};
use tracing::debug;

/// Registry of enabled detectors plus the engine configuration.
///
/// Detection is a pure computation over an immutable window snapshot: the
/// engine holds no per-call state, so one instance can serve many threads
/// concurrently without locking.
pub struct PatternEngine {
    config: EngineConfig,
    detectors: Vec<Box<dyn PatternDetector>>,
}

impl PatternEngine {
    /// Build the registry from a validated configuration.
    ///
    /// Weight sums are checked here for every enabled detector, so a
    /// mis-declared pattern fails at startup instead of skewing confidences
    /// at runtime.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let detectors: Vec<Box<dyn PatternDetector>> = all_detectors()
            .into_iter()
            .filter(|d| !config.disabled_patterns.contains(&d.id()))
            .collect();

        for detector in &detectors {
            let sum = detector.profile().weights.sum();
            if (sum - 1.0).abs() > 1e-6 {
                return Err(EngineError::Configuration(format!(
                    "scorer weights for pattern {} sum to {}, expected 1.0",
                    detector.id(),
                    sum
                )));
            }
        }

        Ok(Self { config, detectors })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enabled detectors in registry order.
    pub fn detectors(&self) -> impl Iterator<Item = &dyn PatternDetector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    /// Run every enabled detector against one window and return all
    /// qualifying results, highest confidence first.
    ///
    /// Conflicting directions firing on the same candle are returned as-is;
    /// disambiguation belongs to the caller. Short or empty windows simply
    /// yield fewer results, never an error.
    pub fn detect_patterns(
        &self,
        symbol: &str,
        window: &CandleWindow,
        regime: MarketRegime,
        current_price: f64,
        avg_volume: f64,
    ) -> Vec<PatternResult> {
        let ctx = DetectionContext {
            symbol,
            window,
            regime,
            current_price,
            avg_volume,
            config: &self.config,
        };

        let mut results: Vec<PatternResult> = self
            .detectors
            .iter()
            .filter_map(|detector| {
                let result = detector.detect(&ctx);
                if let Some(r) = &result {
                    debug!(
                        symbol,
                        pattern = %r.pattern,
                        direction = %r.direction,
                        confidence = r.confidence,
                        "pattern detected"
                    );
                }
                result
            })
            .collect();

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Candle;
    use crate::patterns::PatternId;
    use chrono::{TimeZone, Utc};
    use chrono::DateTime;

    fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            min_confidence: 0.0,
            atr_period: 3,
            ..Default::default()
        }
    }

    #[test]
    fn engine_registers_nineteen_detectors_by_default() {
        let engine = PatternEngine::new(test_config()).unwrap();
        assert_eq!(engine.detectors().count(), 19);
    }

    #[test]
    fn disabled_patterns_are_dropped_from_the_registry() {
        let mut config = test_config();
        config.disabled_patterns.insert(PatternId::Doji);
        config.disabled_patterns.insert(PatternId::Hammer);
        let engine = PatternEngine::new(config).unwrap();
        assert_eq!(engine.detectors().count(), 17);
        assert!(engine.detectors().all(|d| d.id() != PatternId::Doji));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = EngineConfig {
            min_confidence: -1.0,
            ..Default::default()
        };
        assert!(PatternEngine::new(config).is_err());
    }

    #[test]
    fn short_window_yields_empty_results_without_error() {
        let engine = PatternEngine::new(test_config()).unwrap();
        let window = CandleWindow::new(vec![
            candle(0, 100.0, 101.0, 99.0, 100.5),
            candle(1, 100.5, 101.5, 99.5, 101.0),
        ])
        .unwrap();

        // Too short for the ATR period, and far too short for the 3- and
        // 5-candle detectors: every detector must skip quietly.
        let results = engine.detect_patterns("TEST", &window, MarketRegime::Neutral, 101.0, 1000.0);
        assert!(results.is_empty());
    }

    #[test]
    fn results_are_sorted_by_descending_confidence() {
        let engine = PatternEngine::new(test_config()).unwrap();

        // Downtrend into a four-price doji: the doji and any co-firing
        // single-candle detectors come back ordered.
        let mut candles: Vec<Candle> = (0..8)
            .map(|i| {
                let base = 110.0 - i as f64;
                candle(i, base, base + 0.5, base - 1.5, base - 1.0)
            })
            .collect();
        candles.push(candle(8, 101.0, 101.0, 101.0, 101.0));
        let window = CandleWindow::new(candles).unwrap();

        let results = engine.detect_patterns("TEST", &window, MarketRegime::Neutral, 101.0, 1000.0);
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn result_timestamps_come_from_the_signal_candle() {
        let engine = PatternEngine::new(test_config()).unwrap();
        let mut candles: Vec<Candle> = (0..6)
            .map(|i| {
                let base = 110.0 - i as f64;
                candle(i, base, base + 0.5, base - 1.5, base - 1.0)
            })
            .collect();
        let signal_ts: DateTime<Utc> = Utc.timestamp_opt(6 * 60, 0).unwrap();
        candles.push(candle(6, 103.0, 103.0, 103.0, 103.0));
        let window = CandleWindow::new(candles).unwrap();

        let results = engine.detect_patterns("TEST", &window, MarketRegime::Neutral, 103.0, 1000.0);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.timestamp == signal_ts));
        assert!(results.iter().all(|r| r.symbol == "TEST"));
    }
}
