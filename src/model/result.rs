// src/model/result.rs
use crate::model::Direction;
use crate::patterns::PatternId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Grouping of the detector family a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    Reversal,
    Continuation,
    Indecision,
    MultiCandle,
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternFamily::Reversal => write!(f, "reversal"),
            PatternFamily::Continuation => write!(f, "continuation"),
            PatternFamily::Indecision => write!(f, "indecision"),
            PatternFamily::MultiCandle => write!(f, "multi_candle"),
        }
    }
}

/// One graded pattern detection.
///
/// Produced only when the detector's geometric predicate holds and the
/// composed confidence clears the configured minimum. Owned by the caller
/// once returned; the engine keeps no copy.
#[derive(Debug, Clone, Serialize)]
pub struct PatternResult {
    /// Which detector fired
    pub pattern: PatternId,
    pub family: PatternFamily,
    pub direction: Direction,
    /// Weighted confidence in [0, 10]
    pub confidence: f64,
    /// Projected exit above/below the close, scaled by ATR
    pub target_price: f64,
    pub stop_price: f64,
    /// Sub-score name -> value for every scorer the pattern weights
    pub contributing_scores: BTreeMap<String, f64>,
    pub symbol: String,
    /// Timestamp of the signal candle (most recent in the window)
    pub timestamp: DateTime<Utc>,
    /// How many candles the geometric predicate examined
    pub lookback_used: usize,
}
