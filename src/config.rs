// src/config.rs
use crate::error::EngineError;
use crate::patterns::PatternId;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_min_confidence() -> f64 {
    5.0
}

fn default_atr_period() -> usize {
    14
}

fn default_target_multiplier() -> f64 {
    2.0
}

fn default_stop_multiplier() -> f64 {
    1.5
}

/// Engine-wide detection parameters.
///
/// Created once at startup and read-only afterwards; every validation
/// problem is raised here, never during a detection call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Results below this confidence are dropped (0-10)
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Smoothing window for the ATR estimator
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
    /// Projected target distance in ATR multiples
    #[serde(default = "default_target_multiplier")]
    pub atr_target_multiplier: f64,
    /// Projected stop distance in ATR multiples
    #[serde(default = "default_stop_multiplier")]
    pub atr_stop_multiplier: f64,
    /// Pattern identifiers to skip entirely
    #[serde(default)]
    pub disabled_patterns: HashSet<PatternId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            atr_period: default_atr_period(),
            atr_target_multiplier: default_target_multiplier(),
            atr_stop_multiplier: default_stop_multiplier(),
            disabled_patterns: HashSet::new(),
        }
    }
}

impl EngineConfig {
    /// Layer defaults, an optional TOML/JSON file and `PATTERN_`-prefixed
    /// environment variables into a validated config.
    ///
    /// Unknown pattern identifiers in `disabled_patterns` fail
    /// deserialization here, so a typo never silently enables a pattern.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("PATTERN")
                    .try_parsing(true),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks for every tunable.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=10.0).contains(&self.min_confidence) {
            return Err(EngineError::Configuration(format!(
                "min_confidence must be within [0, 10], got {}",
                self.min_confidence
            )));
        }
        if self.atr_period < 1 {
            return Err(EngineError::Configuration(
                "atr_period must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("atr_target_multiplier", self.atr_target_multiplier),
            ("atr_stop_multiplier", self.atr_stop_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::Configuration(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
