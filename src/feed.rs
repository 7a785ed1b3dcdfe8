// src/feed.rs
//
// JSON candle-file ingestion for the CLI consumer. The engine itself never
// touches the filesystem; this is the adapter that feeds it.
use crate::model::{Candle, CandleWindow};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a JSON array of candles into a validated window.
///
/// Expected shape per element: `{"timestamp": "2024-01-05T10:00:00Z",
/// "open": .., "high": .., "low": .., "close": .., "volume": ..}`.
pub fn load_window(path: &Path) -> Result<CandleWindow> {
    let file =
        File::open(path).with_context(|| format!("failed to open candle file {}", path.display()))?;
    let candles: Vec<Candle> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse candle file {}", path.display()))?;
    let window = CandleWindow::new(candles)
        .with_context(|| format!("invalid candle data in {}", path.display()))?;
    Ok(window)
}

/// Trailing average volume over every candle except the signal candle.
///
/// The engine treats average volume as caller-supplied context; this is the
/// baseline the CLI hands it.
pub fn trailing_avg_volume(window: &CandleWindow) -> f64 {
    let candles = window.as_slice();
    if candles.len() < 2 {
        return 0.0;
    }
    let trailing = &candles[..candles.len() - 1];
    trailing.iter().map(|c| c.volume).sum::<f64>() / trailing.len() as f64
}
