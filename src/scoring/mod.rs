// Module exports
pub mod volatility;

pub use volatility::{atr, true_ranges};

use crate::model::{Candle, CandleWindow, Direction, MarketRegime, PatternResult};
use crate::patterns::{DetectionContext, PatternDetector};
use std::collections::BTreeMap;
use tracing::debug;

/// Relative weight of each sub-scorer for one pattern.
///
/// Weights of an enabled pattern must sum to 1.0; a weight of 0.0 disables
/// the scorer for that pattern and keeps it out of the contributing scores.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub body: f64,
    pub volume: f64,
    pub trend: f64,
    pub position: f64,
    pub regime: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.body + self.volume + self.trend + self.position + self.regime
    }
}

/// Scoring parameters a pattern declares alongside its weights.
#[derive(Debug, Clone, Copy)]
pub struct ScoreProfile {
    pub weights: ScoreWeights,
    /// Body-to-range ratio the body scorer grades against
    pub ideal_body_ratio: f64,
    /// How many pre-pattern closes the trend scorer examines
    pub trend_periods: usize,
    /// Pre-pattern drift the pattern wants (Neutral accepts either run)
    pub trend_direction: Direction,
    /// Swing window for the position scorer
    pub position_lookback: usize,
}

/// Body score: how close the signal candle's body-to-range ratio comes to
/// the pattern's ideal, capped at 10 once the ideal is reached.
pub fn body_score(candle: &Candle, ideal_ratio: f64) -> f64 {
    if ideal_ratio <= 0.0 {
        return 0.0;
    }
    (candle.body_ratio() / ideal_ratio * 10.0).clamp(0.0, 10.0)
}

/// Volume score: signal volume relative to the trailing average volume.
pub fn volume_score(volume: f64, avg_volume: f64) -> f64 {
    if avg_volume <= 0.0 {
        // No baseline to judge against
        return 5.0;
    }
    let ratio = volume / avg_volume;
    if ratio >= 2.0 {
        10.0
    } else if ratio >= 1.5 {
        7.0
    } else if ratio >= 1.0 {
        5.0
    } else if ratio >= 0.5 {
        3.0
    } else {
        1.0
    }
}

/// Trend score: fraction of the `periods` close-to-close moves immediately
/// before the pattern's candles that run in the required direction.
///
/// Missing history counts against the score, it never errors. A Neutral
/// requirement (indecision patterns) takes the stronger of the two runs,
/// since indecision only matters after a trend worth doubting.
pub fn trend_score(
    window: &CandleWindow,
    lookback: usize,
    periods: usize,
    required: Direction,
) -> f64 {
    if periods == 0 {
        return 5.0;
    }
    let candles = window.as_slice();
    if candles.len() <= lookback {
        return 0.0;
    }

    let pre_end = candles.len() - lookback;
    let first = pre_end.saturating_sub(periods);

    let mut up = 0usize;
    let mut down = 0usize;
    for i in first..pre_end {
        if i == 0 {
            continue;
        }
        if candles[i].close > candles[i - 1].close {
            up += 1;
        } else if candles[i].close < candles[i - 1].close {
            down += 1;
        }
    }

    let matching = match required {
        Direction::Bullish => up,
        Direction::Bearish => down,
        Direction::Neutral => up.max(down),
    };

    (matching as f64 / periods as f64 * 10.0).clamp(0.0, 10.0)
}

/// Position score: linear proximity of the signal candle to the swing
/// extreme over the lookback window. Bullish patterns want the low near the
/// swing low, bearish patterns the high near the swing high.
pub fn position_score(window: &CandleWindow, lookback: usize, direction: Direction) -> f64 {
    let candles = window.as_slice();
    let signal = match candles.last() {
        Some(c) => c,
        None => return 0.0,
    };

    let n = lookback.clamp(1, candles.len());
    let recent = &candles[candles.len() - n..];
    let swing_low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let swing_high = recent
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let span = swing_high - swing_low;
    if span <= 0.0 {
        return 5.0;
    }

    let near_low = (1.0 - (signal.low - swing_low) / span) * 10.0;
    let near_high = (1.0 - (swing_high - signal.high) / span) * 10.0;

    match direction {
        Direction::Bullish => near_low,
        Direction::Bearish => near_high,
        Direction::Neutral => near_low.max(near_high),
    }
    .clamp(0.0, 10.0)
}

/// Regime score: agreement between the pattern's direction and the supplied
/// market regime.
pub fn regime_score(direction: Direction, regime: MarketRegime) -> f64 {
    match (direction, regime) {
        (Direction::Bullish, MarketRegime::Bullish)
        | (Direction::Bearish, MarketRegime::Bearish)
        | (Direction::Neutral, MarketRegime::Neutral) => 9.0,
        (_, MarketRegime::Neutral) | (Direction::Neutral, _) => 6.0,
        _ => 2.0,
    }
}

/// ATR-scaled exit levels around the signal close.
///
/// Neutral patterns use the bullish orientation: target above, stop below.
pub fn exit_levels(
    close: f64,
    atr_value: f64,
    direction: Direction,
    target_multiplier: f64,
    stop_multiplier: f64,
) -> (f64, f64) {
    match direction {
        Direction::Bearish => (
            close - atr_value * target_multiplier,
            close + atr_value * stop_multiplier,
        ),
        _ => (
            close + atr_value * target_multiplier,
            close - atr_value * stop_multiplier,
        ),
    }
}

/// Compose a graded result for a detector whose geometric predicate already
/// matched. Returns None when the ATR cannot be computed or the composed
/// confidence falls short of the configured minimum.
pub fn grade<D: PatternDetector + ?Sized>(
    ctx: &DetectionContext<'_>,
    detector: &D,
) -> Option<PatternResult> {
    let atr_value = atr(ctx.window, ctx.config.atr_period).ok()?;
    let signal = *ctx.window.last()?;

    let profile = detector.profile();
    let weights = profile.weights;
    let direction = detector.direction();
    let lookback = detector.required_lookback();

    let mut contributing = BTreeMap::new();
    let mut confidence = 0.0;

    if weights.body > 0.0 {
        let score = body_score(&signal, profile.ideal_body_ratio);
        confidence += weights.body * score;
        contributing.insert("body".to_string(), score);
    }
    if weights.volume > 0.0 {
        let score = volume_score(signal.volume, ctx.avg_volume);
        confidence += weights.volume * score;
        contributing.insert("volume".to_string(), score);
    }
    if weights.trend > 0.0 {
        let score = trend_score(
            ctx.window,
            lookback,
            profile.trend_periods,
            profile.trend_direction,
        );
        confidence += weights.trend * score;
        contributing.insert("trend".to_string(), score);
    }
    if weights.position > 0.0 {
        let score = position_score(ctx.window, profile.position_lookback, direction);
        confidence += weights.position * score;
        contributing.insert("position".to_string(), score);
    }
    if weights.regime > 0.0 {
        let score = regime_score(direction, ctx.regime);
        confidence += weights.regime * score;
        contributing.insert("regime".to_string(), score);
    }

    let confidence = confidence.clamp(0.0, 10.0);
    if confidence < ctx.config.min_confidence {
        debug!(
            pattern = %detector.id(),
            confidence,
            min = ctx.config.min_confidence,
            "pattern matched geometrically but fell below minimum confidence"
        );
        return None;
    }

    let (target_price, stop_price) = exit_levels(
        signal.close,
        atr_value,
        direction,
        ctx.config.atr_target_multiplier,
        ctx.config.atr_stop_multiplier,
    );

    Some(PatternResult {
        pattern: detector.id(),
        family: detector.family(),
        direction,
        confidence,
        target_price,
        stop_price,
        contributing_scores: contributing,
        symbol: ctx.symbol.to_string(),
        timestamp: signal.timestamp,
        lookback_used: lookback,
    })
}
