// Module exports
mod candle;
mod result;

// Public exports
pub use candle::{Candle, CandleWindow, Direction, MarketRegime};
pub use result::{PatternFamily, PatternResult};
