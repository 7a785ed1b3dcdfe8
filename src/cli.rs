// src/cli.rs
use crate::config::EngineConfig;
use crate::engine::PatternEngine;
use crate::feed;
use crate::model::MarketRegime;
use crate::scan::{scan_jobs, ScanJob};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "candle-pattern-engine")]
#[command(about = "Candlestick pattern classification engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one candle file for patterns
    Scan {
        /// JSON candle file (array of OHLCV records, oldest first)
        #[arg(long)]
        file: PathBuf,

        /// Symbol to stamp on the results
        #[arg(long)]
        symbol: String,

        /// Market regime context: bullish, bearish or neutral
        #[arg(long, default_value = "neutral")]
        regime: String,

        /// Optional engine config file (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Scan every *.json candle file in a directory, in parallel
    ScanDir {
        /// Directory of candle files; the file stem becomes the symbol
        #[arg(long)]
        dir: PathBuf,

        /// Market regime context applied to every symbol
        #[arg(long, default_value = "neutral")]
        regime: String,

        /// Optional engine config file (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads (defaults to the CPU count)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Emit results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the registered pattern detectors
    Patterns {
        /// Optional engine config file (applies disabled_patterns)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a config file and print the effective settings
    CheckConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            file,
            symbol,
            regime,
            config,
            json,
        } => run_scan(&file, &symbol, &regime, config.as_deref(), json),
        Commands::ScanDir {
            dir,
            regime,
            config,
            concurrency,
            json,
        } => run_scan_dir(&dir, &regime, config.as_deref(), concurrency, json),
        Commands::Patterns { config } => list_patterns(config.as_deref()),
        Commands::CheckConfig { config } => check_config(config.as_deref()),
    }
}

fn build_engine(config_path: Option<&Path>) -> Result<PatternEngine> {
    let config = EngineConfig::load(config_path).context("failed to load engine configuration")?;
    let engine = PatternEngine::new(config).context("failed to build pattern engine")?;
    Ok(engine)
}

fn parse_regime(raw: &str) -> Result<MarketRegime> {
    raw.parse::<MarketRegime>().map_err(|e| anyhow!(e))
}

fn run_scan(
    file: &Path,
    symbol: &str,
    regime: &str,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let engine = build_engine(config_path)?;
    let regime = parse_regime(regime)?;

    let window = feed::load_window(file)?;
    let current_price = window.last().map(|c| c.close).unwrap_or_default();
    let avg_volume = feed::trailing_avg_volume(&window);

    info!(symbol, candles = window.len(), %regime, "scanning window");
    let results = engine.detect_patterns(symbol, &window, regime, current_price, avg_volume);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No patterns detected for {}.", symbol);
    } else {
        print_result_table(&results);
    }

    Ok(())
}

fn run_scan_dir(
    dir: &Path,
    regime: &str,
    config_path: Option<&Path>,
    concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let engine = build_engine(config_path)?;
    let regime = parse_regime(regime)?;

    let mut jobs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read candle directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let symbol = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_uppercase();

        match feed::load_window(&path) {
            Ok(window) => {
                let current_price = window.last().map(|c| c.close).unwrap_or_default();
                let avg_volume = feed::trailing_avg_volume(&window);
                jobs.push(ScanJob {
                    symbol,
                    window,
                    regime,
                    current_price,
                    avg_volume,
                });
            }
            // One bad file should not sink the whole batch
            Err(e) => warn!(file = %path.display(), "skipping candle file: {:#}", e),
        }
    }

    if jobs.is_empty() {
        println!("No candle files found in {}.", dir.display());
        return Ok(());
    }

    let threads = concurrency.unwrap_or_else(num_cpus::get);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("failed to build scan thread pool")?;

    info!(symbols = jobs.len(), threads, "starting batch scan");
    let reports = pool.install(|| scan_jobs(&engine, &jobs));

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if report.results.is_empty() {
                continue;
            }
            println!("== {} ==", report.symbol);
            print_result_table(&report.results);
        }
        let detections: usize = reports.iter().map(|r| r.results.len()).sum();
        println!(
            "Scanned {} symbols, {} detections.",
            reports.len(),
            detections
        );
    }

    Ok(())
}

fn list_patterns(config_path: Option<&Path>) -> Result<()> {
    let engine = build_engine(config_path)?;

    println!(
        "{:<24} {:<14} {:<10} {}",
        "PATTERN", "FAMILY", "DIRECTION", "LOOKBACK"
    );
    for detector in engine.detectors() {
        println!(
            "{:<24} {:<14} {:<10} {}",
            detector.id().to_string(),
            detector.family().to_string(),
            detector.direction().to_string(),
            detector.required_lookback()
        );
    }

    Ok(())
}

fn check_config(config_path: Option<&Path>) -> Result<()> {
    let config = EngineConfig::load(config_path).context("configuration is invalid")?;
    println!("Configuration OK:");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_result_table(results: &[crate::model::PatternResult]) {
    println!(
        "{:<24} {:<10} {:>6} {:>12} {:>12}",
        "PATTERN", "DIRECTION", "CONF", "TARGET", "STOP"
    );
    for result in results {
        println!(
            "{:<24} {:<10} {:>6.2} {:>12.4} {:>12.4}",
            result.pattern.to_string(),
            result.direction.to_string(),
            result.confidence,
            result.target_price,
            result.stop_price
        );
    }
}
