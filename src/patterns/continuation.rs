// src/patterns/continuation.rs
//
// Continuation detectors confirm the prevailing move rather than oppose it,
// so their trend scorer expects drift in the same direction as the signal.
use crate::model::{Candle, CandleWindow, Direction, PatternFamily};
use crate::patterns::helpers;
use crate::patterns::{PatternDetector, PatternId};
use crate::scoring::{ScoreProfile, ScoreWeights};

const MARUBOZU_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.40,
        volume: 0.25,
        trend: 0.20,
        position: 0.0,
        regime: 0.15,
    },
    ideal_body_ratio: 0.95,
    trend_periods: 3,
    trend_direction: Direction::Bullish,
    position_lookback: 10,
};

const THREE_METHODS_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.25,
        volume: 0.20,
        trend: 0.35,
        position: 0.0,
        regime: 0.20,
    },
    ideal_body_ratio: 0.7,
    trend_periods: 4,
    trend_direction: Direction::Bullish,
    position_lookback: 10,
};

const fn mirrored(profile: ScoreProfile) -> ScoreProfile {
    ScoreProfile {
        weights: profile.weights,
        ideal_body_ratio: profile.ideal_body_ratio,
        trend_periods: profile.trend_periods,
        trend_direction: Direction::Bearish,
        position_lookback: profile.position_lookback,
    }
}

// Marubozu geometry: the body swallows nearly the whole range.
fn marubozu_shape(c: &Candle) -> bool {
    let range = c.range();
    range > 0.0
        && c.body() >= 0.9 * range
        && c.upper_wick() <= 0.05 * range
        && c.lower_wick() <= 0.05 * range
}

/// Bullish Marubozu: full-bodied up candle with negligible wicks.
pub struct BullishMarubozu;

impl PatternDetector for BullishMarubozu {
    fn id(&self) -> PatternId {
        PatternId::BullishMarubozu
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Continuation
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        MARUBOZU_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window
            .last()
            .is_some_and(|c| c.is_bullish() && marubozu_shape(c))
    }
}

/// Bearish Marubozu: mirror of the bullish variant.
pub struct BearishMarubozu;

impl PatternDetector for BearishMarubozu {
    fn id(&self) -> PatternId {
        PatternId::BearishMarubozu
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Continuation
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(MARUBOZU_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window
            .last()
            .is_some_and(|c| c.is_bearish() && marubozu_shape(c))
    }
}

/// Rising Three Methods: a long bullish candle, three small candles drifting
/// lower inside its range, then a long bullish candle closing at a new high
/// for the sequence.
pub struct RisingThreeMethods;

impl PatternDetector for RisingThreeMethods {
    fn id(&self) -> PatternId {
        PatternId::RisingThreeMethods
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Continuation
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        5
    }

    fn profile(&self) -> ScoreProfile {
        THREE_METHODS_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some(tail) = window.tail(5) else {
            return false;
        };
        let (first, middles, last) = (&tail[0], &tail[1..4], &tail[4]);

        // Criteria:
        // 1. First candle long and bullish
        // 2. Three small-bodied candles drifting lower, each trading inside
        //    the first candle's range
        // 3. Final candle long and bullish, closing above the first close
        if !(first.is_bullish() && first.body_ratio() >= 0.5) {
            return false;
        }

        let contained = middles.iter().all(|c| {
            helpers::is_small_body(c, first.body(), 0.5)
                && helpers::within_range(c, first.low, first.high)
        });
        let drifting_lower =
            middles[0].close > middles[1].close && middles[1].close > middles[2].close;

        contained
            && drifting_lower
            && last.is_bullish()
            && last.body_ratio() >= 0.5
            && last.close > first.close
    }
}

/// Falling Three Methods: mirror of the rising variant.
pub struct FallingThreeMethods;

impl PatternDetector for FallingThreeMethods {
    fn id(&self) -> PatternId {
        PatternId::FallingThreeMethods
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Continuation
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        5
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(THREE_METHODS_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some(tail) = window.tail(5) else {
            return false;
        };
        let (first, middles, last) = (&tail[0], &tail[1..4], &tail[4]);

        if !(first.is_bearish() && first.body_ratio() >= 0.5) {
            return false;
        }

        let contained = middles.iter().all(|c| {
            helpers::is_small_body(c, first.body(), 0.5)
                && helpers::within_range(c, first.low, first.high)
        });
        let drifting_higher =
            middles[0].close < middles[1].close && middles[1].close < middles[2].close;

        contained
            && drifting_higher
            && last.is_bearish()
            && last.body_ratio() >= 0.5
            && last.close < first.close
    }
}
