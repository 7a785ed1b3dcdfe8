// src/patterns/indecision.rs
//
// Indecision detectors are direction-neutral: the body scorer is switched
// off (a tiny body is the predicate, not a quality signal) and the trend
// scorer accepts a strong run in either direction, since indecision is only
// meaningful after a move worth doubting.
use crate::model::{Candle, CandleWindow, Direction, PatternFamily};
use crate::patterns::{PatternDetector, PatternId};
use crate::scoring::{ScoreProfile, ScoreWeights};

const DOJI_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.0,
        volume: 0.20,
        trend: 0.35,
        position: 0.25,
        regime: 0.20,
    },
    ideal_body_ratio: 0.05,
    trend_periods: 4,
    trend_direction: Direction::Neutral,
    position_lookback: 10,
};

const BALANCED_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.0,
        volume: 0.15,
        trend: 0.35,
        position: 0.25,
        regime: 0.25,
    },
    ideal_body_ratio: 0.2,
    trend_periods: 4,
    trend_direction: Direction::Neutral,
    position_lookback: 10,
};

/// Doji: open and close within 10% of the range of each other, direction
/// irrelevant. A four-price candle (open = high = low = close) counts.
pub struct Doji;

impl PatternDetector for Doji {
    fn id(&self) -> PatternId {
        PatternId::Doji
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Indecision
    }

    fn direction(&self) -> Direction {
        Direction::Neutral
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        DOJI_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(|c| {
            if c.range() <= 0.0 {
                c.body() == 0.0
            } else {
                c.body() <= 0.1 * c.range()
            }
        })
    }
}

/// Spinning Top: small body with roughly balanced wicks on both sides.
pub struct SpinningTop;

impl PatternDetector for SpinningTop {
    fn id(&self) -> PatternId {
        PatternId::SpinningTop
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Indecision
    }

    fn direction(&self) -> Direction {
        Direction::Neutral
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        BALANCED_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(spinning_top_shape)
    }
}

fn spinning_top_shape(c: &Candle) -> bool {
    if c.range() <= 0.0 {
        return false;
    }
    let ratio = c.body_ratio();
    let upper = c.upper_wick();
    let lower = c.lower_wick();

    // Criteria:
    // 1. Body between 10% and 30% of the range (below 10% it is a doji)
    // 2. Both wicks present and within 2x of each other
    ratio > 0.1 && ratio <= 0.3 && upper > 0.0 && lower > 0.0 && {
        let balance = upper / lower;
        (0.5..=2.0).contains(&balance)
    }
}

/// High Wave: small body with exceptionally long wicks on both sides,
/// violent two-way trade that went nowhere.
pub struct HighWave;

impl PatternDetector for HighWave {
    fn id(&self) -> PatternId {
        PatternId::HighWave
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::Indecision
    }

    fn direction(&self) -> Direction {
        Direction::Neutral
    }

    fn required_lookback(&self) -> usize {
        1
    }

    fn profile(&self) -> ScoreProfile {
        BALANCED_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        window.last().is_some_and(|c| {
            let range = c.range();
            range > 0.0
                && c.body() <= 0.2 * range
                && c.upper_wick() >= 0.35 * range
                && c.lower_wick() >= 0.35 * range
        })
    }
}
