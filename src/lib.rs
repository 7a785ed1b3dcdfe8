// Export all necessary modules
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod model;
pub mod patterns;
pub mod scan;
pub mod scoring;

// Re-export the main entry points
pub use config::EngineConfig;
pub use engine::PatternEngine;
pub use error::EngineError;
pub use model::{Candle, CandleWindow, Direction, MarketRegime, PatternFamily, PatternResult};
pub use patterns::{PatternDetector, PatternId};
