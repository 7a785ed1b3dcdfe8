// src/scan.rs
use crate::engine::PatternEngine;
use crate::model::{CandleWindow, MarketRegime, PatternResult};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// One symbol's worth of work for a batch scan.
#[derive(Debug)]
pub struct ScanJob {
    pub symbol: String,
    pub window: CandleWindow,
    pub regime: MarketRegime,
    pub current_price: f64,
    pub avg_volume: f64,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub symbol: String,
    pub results: Vec<PatternResult>,
}

/// Fan `detect_patterns` across many symbols on the rayon pool.
///
/// Safe because detection only reads its own window and the shared
/// read-only engine; reports come back in job order.
pub fn scan_jobs(engine: &PatternEngine, jobs: &[ScanJob]) -> Vec<ScanReport> {
    let reports: Vec<ScanReport> = jobs
        .par_iter()
        .map(|job| ScanReport {
            symbol: job.symbol.clone(),
            results: engine.detect_patterns(
                &job.symbol,
                &job.window,
                job.regime,
                job.current_price,
                job.avg_volume,
            ),
        })
        .collect();

    let detections: usize = reports.iter().map(|r| r.results.len()).sum();
    info!(
        symbols = jobs.len(),
        detections, "batch scan complete"
    );

    reports
}
