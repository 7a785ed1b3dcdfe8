// Module exports
mod continuation;
mod helpers;
mod indecision;
mod multi_candle;
mod reversal;

// Public exports
pub use continuation::{
    BearishMarubozu, BullishMarubozu, FallingThreeMethods, RisingThreeMethods,
};
pub use indecision::{Doji, HighWave, SpinningTop};
pub use multi_candle::{ThreeBlackCrows, ThreeWhiteSoldiers};
pub use reversal::{
    BearishEngulfing, BullishEngulfing, DarkCloudCover, EveningStar, Hammer, HangingMan,
    InvertedHammer, MorningStar, PiercingLine, ShootingStar,
};

use crate::config::EngineConfig;
use crate::model::{CandleWindow, Direction, MarketRegime, PatternFamily, PatternResult};
use crate::scoring::{self, ScoreProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for each of the 19 pattern detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    BullishEngulfing,
    BearishEngulfing,
    Hammer,
    InvertedHammer,
    HangingMan,
    ShootingStar,
    MorningStar,
    EveningStar,
    PiercingLine,
    DarkCloudCover,
    BullishMarubozu,
    BearishMarubozu,
    RisingThreeMethods,
    FallingThreeMethods,
    Doji,
    SpinningTop,
    HighWave,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
}

impl PatternId {
    pub const ALL: [PatternId; 19] = [
        PatternId::BullishEngulfing,
        PatternId::BearishEngulfing,
        PatternId::Hammer,
        PatternId::InvertedHammer,
        PatternId::HangingMan,
        PatternId::ShootingStar,
        PatternId::MorningStar,
        PatternId::EveningStar,
        PatternId::PiercingLine,
        PatternId::DarkCloudCover,
        PatternId::BullishMarubozu,
        PatternId::BearishMarubozu,
        PatternId::RisingThreeMethods,
        PatternId::FallingThreeMethods,
        PatternId::Doji,
        PatternId::SpinningTop,
        PatternId::HighWave,
        PatternId::ThreeWhiteSoldiers,
        PatternId::ThreeBlackCrows,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::BullishEngulfing => "bullish_engulfing",
            PatternId::BearishEngulfing => "bearish_engulfing",
            PatternId::Hammer => "hammer",
            PatternId::InvertedHammer => "inverted_hammer",
            PatternId::HangingMan => "hanging_man",
            PatternId::ShootingStar => "shooting_star",
            PatternId::MorningStar => "morning_star",
            PatternId::EveningStar => "evening_star",
            PatternId::PiercingLine => "piercing_line",
            PatternId::DarkCloudCover => "dark_cloud_cover",
            PatternId::BullishMarubozu => "bullish_marubozu",
            PatternId::BearishMarubozu => "bearish_marubozu",
            PatternId::RisingThreeMethods => "rising_three_methods",
            PatternId::FallingThreeMethods => "falling_three_methods",
            PatternId::Doji => "doji",
            PatternId::SpinningTop => "spinning_top",
            PatternId::HighWave => "high_wave",
            PatternId::ThreeWhiteSoldiers => "three_white_soldiers",
            PatternId::ThreeBlackCrows => "three_black_crows",
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternId::ALL
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown pattern identifier: {}", s))
    }
}

/// Everything one detection call reads. Borrowed per call; the core keeps
/// no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub symbol: &'a str,
    pub window: &'a CandleWindow,
    pub regime: MarketRegime,
    pub current_price: f64,
    pub avg_volume: f64,
    pub config: &'a EngineConfig,
}

/// Contract every pattern detector implements.
///
/// A detector is a pure predicate plus a scoring profile. The shared
/// `detect` flow lives here as a default method calling into the stateless
/// scoring toolkit, so individual detectors differ only in their geometric
/// thresholds, declared lookback and weights.
pub trait PatternDetector: Send + Sync {
    fn id(&self) -> PatternId;
    fn family(&self) -> PatternFamily;
    fn direction(&self) -> Direction;

    /// How many of the most recent candles the predicate examines.
    /// Scorers may look further back for trend/position context.
    fn required_lookback(&self) -> usize;

    fn profile(&self) -> ScoreProfile;

    /// Deterministic geometric predicate over the last `required_lookback`
    /// candles. Must not inspect anything beyond them.
    fn matches(&self, window: &CandleWindow) -> bool;

    /// Run the full predicate-then-grade flow for one window.
    ///
    /// Short windows, predicate mismatches, unavailable ATR and confidences
    /// below the configured minimum all yield None, never an error.
    fn detect(&self, ctx: &DetectionContext<'_>) -> Option<PatternResult> {
        if ctx.window.len() < self.required_lookback() {
            return None;
        }
        if !self.matches(ctx.window) {
            return None;
        }
        scoring::grade(ctx, self)
    }
}

/// The full detector registry, in a stable reporting order.
pub fn all_detectors() -> Vec<Box<dyn PatternDetector>> {
    vec![
        // Reversal
        Box::new(BullishEngulfing),
        Box::new(BearishEngulfing),
        Box::new(Hammer),
        Box::new(InvertedHammer),
        Box::new(HangingMan),
        Box::new(ShootingStar),
        Box::new(MorningStar),
        Box::new(EveningStar),
        Box::new(PiercingLine),
        Box::new(DarkCloudCover),
        // Continuation
        Box::new(BullishMarubozu),
        Box::new(BearishMarubozu),
        Box::new(RisingThreeMethods),
        Box::new(FallingThreeMethods),
        // Indecision
        Box::new(Doji),
        Box::new(SpinningTop),
        Box::new(HighWave),
        // Multi-candle
        Box::new(ThreeWhiteSoldiers),
        Box::new(ThreeBlackCrows),
    ]
}
