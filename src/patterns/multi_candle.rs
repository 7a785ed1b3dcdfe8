// src/patterns/multi_candle.rs
//
// Marching three-candle formations with a volume requirement on top of the
// pure geometry.
use crate::model::{Candle, CandleWindow, Direction, PatternFamily};
use crate::patterns::helpers;
use crate::patterns::{PatternDetector, PatternId};
use crate::scoring::{ScoreProfile, ScoreWeights};

const SOLDIERS_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.20,
        volume: 0.25,
        trend: 0.20,
        position: 0.15,
        regime: 0.20,
    },
    ideal_body_ratio: 0.6,
    trend_periods: 4,
    trend_direction: Direction::Bearish,
    position_lookback: 20,
};

const CROWS_PROFILE: ScoreProfile = ScoreProfile {
    weights: ScoreWeights {
        body: 0.20,
        volume: 0.25,
        trend: 0.20,
        position: 0.15,
        regime: 0.20,
    },
    ideal_body_ratio: 0.6,
    trend_periods: 4,
    trend_direction: Direction::Bullish,
    position_lookback: 20,
};

/// Three White Soldiers: three advancing bullish candles, each opening
/// inside the previous body and closing at a new high, on non-decreasing
/// volume.
pub struct ThreeWhiteSoldiers;

impl PatternDetector for ThreeWhiteSoldiers {
    fn id(&self) -> PatternId {
        PatternId::ThreeWhiteSoldiers
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::MultiCandle
    }

    fn direction(&self) -> Direction {
        Direction::Bullish
    }

    fn required_lookback(&self) -> usize {
        3
    }

    fn profile(&self) -> ScoreProfile {
        SOLDIERS_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some(tail) = window.tail(3) else {
            return false;
        };

        let all_bullish = tail.iter().all(Candle::is_bullish);
        let stepping = tail.windows(2).all(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            helpers::opens_within_body(curr, prev)
                && curr.close > prev.close
                && curr.high > prev.high
        });
        let volume_building = tail.windows(2).all(|pair| pair[1].volume >= pair[0].volume);

        all_bullish && stepping && volume_building
    }
}

/// Three Black Crows: mirror of the soldiers.
pub struct ThreeBlackCrows;

impl PatternDetector for ThreeBlackCrows {
    fn id(&self) -> PatternId {
        PatternId::ThreeBlackCrows
    }

    fn family(&self) -> PatternFamily {
        PatternFamily::MultiCandle
    }

    fn direction(&self) -> Direction {
        Direction::Bearish
    }

    fn required_lookback(&self) -> usize {
        3
    }

    fn profile(&self) -> ScoreProfile {
        CROWS_PROFILE
    }

    fn matches(&self, window: &CandleWindow) -> bool {
        let Some(tail) = window.tail(3) else {
            return false;
        };

        let all_bearish = tail.iter().all(Candle::is_bearish);
        let stepping = tail.windows(2).all(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            helpers::opens_within_body(curr, prev)
                && curr.close < prev.close
                && curr.low < prev.low
        });
        let volume_building = tail.windows(2).all(|pair| pair[1].volume >= pair[0].volume);

        all_bearish && stepping && volume_building
    }
}
