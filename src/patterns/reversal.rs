// src/patterns/reversal.rs
//
// Reversal detectors fire against the prevailing move: the geometric
// predicate is evaluated on the last 1-3 candles only, while the prior
// trend, swing position and regime context feed the confidence score.
use crate::model::{Candle, CandleWindow, Direction, PatternFamily};
use crate::patterns::helpers;
use crate::patterns::{PatternDetector, PatternId};
use crate::scoring::{ScoreProfile, ScoreWeights};

const ENGULFING_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.25,
        volume: 0.20,
        trend: 0.25,
        position: 0.15,
        regime: 0.15,
    },
    ideal_body_ratio: 0.6,
    trend_periods: 4,
    trend_direction: Direction::Bearish,
    position_lookback: 14,
};

const WICK_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.20,
        volume: 0.15,
        trend: 0.30,
        position: 0.20,
        regime: 0.15,
    },
    ideal_body_ratio: 0.3,
    trend_periods: 5,
    trend_direction: Direction::Bearish,
    position_lookback: 14,
};

const STAR_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.15,
        volume: 0.15,
        trend: 0.30,
        position: 0.25,
        regime: 0.15,
    },
    ideal_body_ratio: 0.6,
    trend_periods: 4,
    trend_direction: Direction::Bearish,
    position_lookback: 14,
};

const PENETRATION_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.20,
        volume: 0.20,
        trend: 0.30,
        position: 0.15,
        regime: 0.15,
    },
    ideal_body_ratio: 0.6,
    trend_periods: 4,
    trend_direction: Direction::Bearish,
    position_lookback: 14,
};

/// Flip a profile's required pre-trend for the bearish mirror patterns.
const fn mirrored(profile: ScoreProfile) -> ScoreProfile {
    ScoreProfile {
        weights: profile.weights,
        ideal_body_ratio: profile.ideal_body_ratio,
        trend_periods: profile.trend_periods,
        trend_direction: Direction::Bullish,
        position_lookback: profile.position_lookback,
    }
}

// Hammer-type geometry: long lower shadow, negligible upper shadow, body in
// the upper third of the range.
fn hammer_shape(c: &Candle) -> bool {
    let body = c.body();
    body > 0.0
        && c.lower_wick() >= 2.0 * body
        && c.upper_wick() <= 0.1 * body
        && c.open.min(c.close) >= c.high - c.range() / 3.0
}

// Mirror of the hammer: long upper shadow, negligible lower shadow, body in
// the lower third.
fn inverted_hammer_shape(c: &Candle) -> bool {
    let body = c.body();
    body > 0.0
        && c.upper_wick() >= 2.0 * body
        && c.lower_wick() <= 0.1 * body
        && c.open.max(c.close) <= c.low + c.range() / 3.0
}

/// Bullish Engulfing: a bearish candle fully engulfed by a larger bullish
/// body.
pub struct BullishEngulfing;

impl PatternDetector for BullishEngulfing {
    fn id(&self) -> PatternId {
        PatternId::BullishEngulfing
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        2
    }

    fn profile(&self) -> ScoreProfile {
        ENGULFING_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([prev, last]) = window.tail(2).map(|t| [&t[0], &t[1]]) else {
            return false;
        };

        // Criteria:
        // 1. Previous candle bearish, current bullish
        // 2. Current body opens at or below the previous close
        // 3. Current body closes at or above the previous open
        // 4. Current body strictly larger than the previous body
        prev.is_bearish()
            && last.is_bullish()
            && last.open <= prev.close
            && last.close >= prev.open
            && last.body() > prev.body()
    }
}

/// Bearish Engulfing: exact mirror of the bullish variant.
pub struct BearishEngulfing;

impl PatternDetector for BearishEngulfing {
    fn id(&self) -> PatternId {
        PatternId::BearishEngulfing
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        2
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(ENGULFING_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([prev, last]) = window.tail(2).map(|t| [&t[0], &t[1]]) else {
            return false;
        };

        prev.is_bullish()
            && last.is_bearish()
            && last.open >= prev.close
            && last.close <= prev.open
            && last.body() > prev.body()
    }
}

/// Hammer: hammer-shaped candle read as a bullish reversal after a decline.
pub struct Hammer;

impl PatternDetector for Hammer {
    fn id(&self) -> PatternId {
        PatternId::Hammer
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        WICK_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(hammer_shape)
    }
}

/// Hanging Man: same geometry as the hammer but bearish, expecting a prior
/// advance. The trend scorer, not the predicate, separates the two.
pub struct HangingMan;

impl PatternDetector for HangingMan {
    fn id(&self) -> PatternId {
        PatternId::HangingMan
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(WICK_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(hammer_shape)
    }
}

/// Inverted Hammer: upside-down hammer after a decline, read bullish.
pub struct InvertedHammer;

impl PatternDetector for InvertedHammer {
    fn id(&self) -> PatternId {
        PatternId::InvertedHammer
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        WICK_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(inverted_hammer_shape)
    }
}

/// Shooting Star: inverted-hammer geometry read bearish after an advance.
pub struct ShootingStar;

impl PatternDetector for ShootingStar {
    fn id(&self) -> PatternId {
        PatternId::ShootingStar
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(WICK_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(inverted_hammer_shape)
    }
}

/// Morning Star: bearish candle, small star gapping below its body, then a
/// bullish candle reclaiming the first body's midpoint.
pub struct MorningStar;

impl PatternDetector for MorningStar {
    fn id(&self) -> PatternId {
        PatternId::MorningStar
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        3
    }

    fn profile(&self) -> ScoreProfile {
        STAR_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([first, star, last]) = window.tail(3).map(|t| [&t[0], &t[1], &t[2]]) else {
            return false;
        };

        // Criteria:
        // 1. First candle bearish with a real body
        // 2. Star body at most 30% of the first body, entirely below the
        //    first close (gap)
        // 3. Third candle bullish, closing above the first body's midpoint
        first.is_bearish()
            && first.body() > 0.0
            && helpers::is_small_body(star, first.body(), 0.3)
            && helpers::body_below(star, first.close)
            && last.is_bullish()
            && last.close > first.body_midpoint()
    }
}

/// Evening Star: mirror of the Morning Star.
pub struct EveningStar;

impl PatternDetector for EveningStar {
    fn id(&self) -> PatternId {
        PatternId::EveningStar
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        3
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(STAR_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([first, star, last]) = window.tail(3).map(|t| [&t[0], &t[1], &t[2]]) else {
            return false;
        };

        first.is_bullish()
            && first.body() > 0.0
            && helpers::is_small_body(star, first.body(), 0.3)
            && helpers::body_above(star, first.close)
            && last.is_bearish()
            && last.close < first.body_midpoint()
    }
}

/// Piercing Line: gap down below the prior low, then a close back above the
/// prior body's midpoint without completing an engulfing.
pub struct PiercingLine;

impl PatternDetector for PiercingLine {
    fn id(&self) -> PatternId {
        PatternId::PiercingLine
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        2
    }

    fn profile(&self) -> ScoreProfile {
        PENETRATION_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([prev, last]) = window.tail(2).map(|t| [&t[0], &t[1]]) else {
            return false;
        };

        // Criteria:
        // 1. Previous candle bearish, current bullish
        // 2. Current opens below the previous low
        // 3. Current closes beyond the previous body's midpoint but still
        //    inside the body (a close past the open would be an engulfing)
        prev.is_bearish()
            && last.is_bullish()
            && last.open < prev.low
            && last.close > prev.body_midpoint()
            && last.close < prev.open
    }
}

/// Dark Cloud Cover: mirror of the Piercing Line.
pub struct DarkCloudCover;

impl PatternDetector for DarkCloudCover {
    fn id(&self) -> PatternId {
        PatternId::DarkCloudCover
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Reversal
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        2
    }

    fn profile(&self) -> ScoreProfile {
        mirrored(PENETRATION_PROFILE)
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some([prev, last]) = window.tail(2).map(|t| [&t[0], &t[1]]) else {
            return false;
        };

        prev.is_bullish()
            && last.is_bearish()
            && last.open > prev.high
            && last.close < prev.body_midpoint()
            && last.close > prev.open
    }
}
