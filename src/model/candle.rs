// src/model/candle.rs
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One open/high/low/close/volume observation for a fixed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time of the interval
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Absolute body size |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full candle range high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Body size relative to range (0.0 when the candle is flat)
    pub fn body_ratio(&self) -> f64 {
        let range = self.range();
        if range > 0.0 {
            self.body() / range
        } else {
            0.0
        }
    }

    /// Shadow above the body
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Shadow below the body
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Midpoint of the body
    pub fn body_midpoint(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Check OHLC consistency for a single candle.
    fn validate(&self, index: usize) -> Result<(), EngineError> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidCandle {
                index,
                reason: "non-finite value".to_string(),
            });
        }
        if values.iter().any(|v| *v < 0.0) {
            return Err(EngineError::InvalidCandle {
                index,
                reason: "negative value".to_string(),
            });
        }
        if self.low > self.open.min(self.close) || self.high < self.open.max(self.close) {
            return Err(EngineError::InvalidCandle {
                index,
                reason: format!(
                    "OHLC relationship violated (o={} h={} l={} c={})",
                    self.open, self.high, self.low, self.close
                ),
            });
        }
        Ok(())
    }
}

/// Immutable, validated sequence of candles, oldest first.
///
/// Construction is the ingestion boundary: malformed OHLC relationships or
/// out-of-order timestamps are rejected here so the detectors never have to
/// re-check them.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    pub fn new(candles: Vec<Candle>) -> Result<Self, EngineError> {
        for (i, candle) in candles.iter().enumerate() {
            candle.validate(i)?;
            if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
                return Err(EngineError::InvalidCandle {
                    index: i,
                    reason: "timestamps not strictly increasing".to_string(),
                });
            }
        }
        Ok(Self { candles })
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle, if any
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The most recent `n` candles, oldest first. None when the window is shorter.
    pub fn tail(&self, n: usize) -> Option<&[Candle]> {
        if self.candles.len() < n {
            return None;
        }
        Some(&self.candles[self.candles.len() - n..])
    }
}

/// Externally supplied classification of the broader trend context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Bullish,
    Bearish,
    Neutral,
}

/// Trade direction implied by a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
            Direction::Neutral => write!(f, "neutral"),
        }
    }
}

impl std::str::FromStr for MarketRegime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bullish" => Ok(MarketRegime::Bullish),
            "bearish" => Ok(MarketRegime::Bearish),
            "neutral" => Ok(MarketRegime::Neutral),
            other => Err(format!("unknown market regime: {}", other)),
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketRegime::Bullish => write!(f, "bullish"),
            MarketRegime::Bearish => write!(f, "bearish"),
            MarketRegime::Neutral => write!(f, "neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(ts: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn window_accepts_valid_candles() {
        let window = CandleWindow::new(vec![
            candle(0, 100.0, 102.0, 99.0, 101.0),
            candle(60, 101.0, 103.0, 100.0, 102.0),
        ])
        .unwrap();
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn window_rejects_high_below_close() {
        let result = CandleWindow::new(vec![candle(0, 100.0, 100.5, 99.0, 101.0)]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidCandle { index: 0, .. })
        ));
    }

    #[test]
    fn window_rejects_unordered_timestamps() {
        let result = CandleWindow::new(vec![
            candle(60, 100.0, 102.0, 99.0, 101.0),
            candle(0, 101.0, 103.0, 100.0, 102.0),
        ]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidCandle { index: 1, .. })
        ));
    }

    #[test]
    fn window_rejects_negative_volume() {
        let mut c = candle(0, 100.0, 102.0, 99.0, 101.0);
        c.volume = -1.0;
        assert!(CandleWindow::new(vec![c]).is_err());
    }

    #[test]
    fn candle_geometry_helpers() {
        let c = candle(0, 100.0, 105.0, 98.0, 103.0);
        assert_eq!(c.body(), 3.0);
        assert_eq!(c.range(), 7.0);
        assert_eq!(c.upper_wick(), 2.0);
        assert_eq!(c.lower_wick(), 2.0);
        assert!(c.is_bullish());
        assert!((c.body_ratio() - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn flat_candle_has_zero_body_ratio() {
        let c = candle(0, 100.0, 100.0, 100.0, 100.0);
        assert_eq!(c.body_ratio(), 0.0);
        assert_eq!(c.range(), 0.0);
    }

    #[test]
    fn tail_requires_enough_candles() {
        let window = CandleWindow::new(vec![candle(0, 100.0, 102.0, 99.0, 101.0)]).unwrap();
        assert!(window.tail(2).is_none());
        assert_eq!(window.tail(1).unwrap().len(), 1);
    }
}
