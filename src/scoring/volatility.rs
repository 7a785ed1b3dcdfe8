// src/scoring/volatility.rs
use crate::error::EngineError;
use crate::model::CandleWindow;

/// Per-candle true range values in chronological order.
///
/// TR_i = max(high - low, |high - prev_close|, |low - prev_close|), defined
/// from the second candle onwards since it needs a previous close.
pub fn true_ranges(window: &CandleWindow) -> Result<Vec<f64>, EngineError> {
    let candles = window.as_slice();
    if candles.len() < 2 {
        return Err(EngineError::InsufficientData {
            required: 2,
            available: candles.len(),
        });
    }

    let mut results = Vec::with_capacity(candles.len() - 1);
    for i in 1..candles.len() {
        let high = candles[i].high;
        let low = candles[i].low;
        let prev_close = candles[i - 1].close;

        let range1 = high - low;
        let range2 = (high - prev_close).abs();
        let range3 = (low - prev_close).abs();

        results.push(range1.max(range2).max(range3));
    }

    Ok(results)
}

/// Average True Range: simple mean of the last `period` true ranges.
///
/// Requires `period + 1` candles. Detectors treat the error as "cannot
/// evaluate" and skip; it is never propagated out of a detection pass.
pub fn atr(window: &CandleWindow, period: usize) -> Result<f64, EngineError> {
    if period == 0 {
        return Err(EngineError::Configuration(
            "ATR period must be at least 1".to_string(),
        ));
    }
    if window.len() < period + 1 {
        return Err(EngineError::InsufficientData {
            required: period + 1,
            available: window.len(),
        });
    }

    let tr_values = true_ranges(window)?;
    let recent = &tr_values[tr_values.len() - period..];

    Ok(recent.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Candle;
    use chrono::{TimeZone, Utc};

    fn window(ohlc: &[(f64, f64, f64, f64)]) -> CandleWindow {
        let candles = ohlc
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Candle {
                timestamp: Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect();
        CandleWindow::new(candles).unwrap()
    }

    #[test]
    fn true_range_uses_previous_close_gaps() {
        // Second candle gaps up: TR must be measured from the prior close,
        // not just high - low.
        let w = window(&[(100.0, 101.0, 99.0, 100.0), (105.0, 106.0, 104.0, 105.0)]);
        let tr = true_ranges(&w).unwrap();
        assert_eq!(tr.len(), 1);
        assert_eq!(tr[0], 6.0); // |106 - 100|
    }

    #[test]
    fn atr_is_mean_of_last_period_true_ranges() {
        let w = window(&[
            (100.0, 102.0, 98.0, 100.0),
            (100.0, 103.0, 99.0, 101.0), // TR 4
            (101.0, 103.0, 101.0, 102.0), // TR 2
            (102.0, 108.0, 102.0, 107.0), // TR 6
        ]);
        let value = atr(&w, 3).unwrap();
        assert!((value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn atr_requires_period_plus_one_candles() {
        let w = window(&[(100.0, 102.0, 98.0, 100.0), (100.0, 103.0, 99.0, 101.0)]);
        let result = atr(&w, 14);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData {
                required: 15,
                available: 2
            })
        ));
    }

    #[test]
    fn atr_is_order_sensitive() {
        // Same set of candles in a different chronological order must change
        // the ATR whenever the true ranges differ, which rules out an
        // order-insensitive implementation.
        let ordered = window(&[
            (100.0, 101.0, 99.0, 100.0),
            (100.0, 110.0, 100.0, 109.0),
            (109.0, 110.0, 108.0, 109.0),
        ]);
        let shuffled = window(&[
            (109.0, 110.0, 108.0, 109.0),
            (100.0, 110.0, 100.0, 109.0),
            (100.0, 101.0, 99.0, 100.0),
        ]);
        let a = atr(&ordered, 2).unwrap();
        let b = atr(&shuffled, 2).unwrap();
        assert!((a - b).abs() > 1e-9);
    }
}
