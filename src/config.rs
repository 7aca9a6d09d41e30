//! Grading settings.
//!
//! Settings are an immutable value handed to every calculation. They come from
//! an optional TOML file and can be overridden field by field from the command
//! line; whoever stores them is outside this crate.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The final degree grade is expressed out of this many points.
pub const DEGREE_SCALE: f64 = 110.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradingConfig {
    /// Upper bound of the native grading scale.
    #[serde(default = "default_max_grade")]
    pub max_grade: u32,
    /// Lowest passing grade; also the floor for solver-assigned grades.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// Credits needed to complete the program.
    #[serde(default = "default_total_credits")]
    pub total_credits: u32,
    /// Desired final average on the 110 scale.
    #[serde(default = "default_target_average")]
    pub target_average: f64,
}

fn default_max_grade() -> u32 {
    30
}
fn default_pass_threshold() -> u32 {
    18
}
fn default_total_credits() -> u32 {
    180
}
fn default_target_average() -> f64 {
    100.0
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            max_grade: default_max_grade(),
            pass_threshold: default_pass_threshold(),
            total_credits: default_total_credits(),
            target_average: default_target_average(),
        }
    }
}

impl GradingConfig {
    /// Reject settings the engine cannot interpret.
    ///
    /// A zero `total_credits` is allowed: progress then reads as 0%.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_grade == 0 {
            return Err(ConfigError::ZeroMaxGrade);
        }
        if self.pass_threshold == 0 {
            return Err(ConfigError::ZeroPassThreshold);
        }
        if self.pass_threshold > self.max_grade {
            return Err(ConfigError::ThresholdAboveMax {
                threshold: self.pass_threshold,
                max_grade: self.max_grade,
            });
        }
        if !(self.target_average > 0.0 && self.target_average <= DEGREE_SCALE) {
            return Err(ConfigError::TargetOutOfRange(self.target_average));
        }
        Ok(())
    }

    /// Target average converted onto the native grading scale.
    pub fn target_native(&self) -> f64 {
        crate::calculator::from_110(self.target_average, self.max_grade)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: GradingConfig = toml::from_str(raw).context("invalid grading config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded grading config");
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
