// src/patterns/helpers.rs
//
// Shared geometry checks used by the multi-candle predicates. Single-candle
// measurements (body, wicks, ratios) live on `Candle` itself.
use crate::model::Candle;

/// Current candle opens inside the previous candle's body.
pub fn opens_within_body(current: &Candle, prev: &Candle) -> bool {
    let body_low = prev.open.min(prev.close);
    let body_high = prev.open.max(prev.close);
    current.open > body_low && current.open < body_high
}

/// Candle body is at most `fraction` of a reference body.
pub fn is_small_body(candle: &Candle, reference_body: f64, fraction: f64) -> bool {
    candle.body() <= reference_body * fraction
}

/// Candle's whole body sits strictly below the given price level.
pub fn body_below(candle: &Candle, level: f64) -> bool {
    candle.open.max(candle.close) < level
}

/// Candle's whole body sits strictly above the given price level.
pub fn body_above(candle: &Candle, level: f64) -> bool {
    candle.open.min(candle.close) > level
}

/// Candle trades entirely inside a high/low band.
pub fn within_range(candle: &Candle, low: f64, high: f64) -> bool {
    candle.low >= low && candle.high <= high
}
