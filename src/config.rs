//! Configuration for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// Chart output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Columns with fewer missing values than this must be complete after cleaning
    #[serde(default = "default_missing_threshold")]
    pub missing_threshold: usize,
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
    /// Minimum distinct races for a group to appear in win data
    #[serde(default = "default_min_races")]
    pub min_races: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub chart: ChartConfig,
}

fn default_missing_threshold() -> usize {
    205
}

fn default_significance_level() -> f64 {
    0.05
}

fn default_min_races() -> usize {
    1
}

fn default_top_n() -> usize {
    5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            missing_threshold: default_missing_threshold(),
            significance_level: default_significance_level(),
            min_races: default_min_races(),
            top_n: default_top_n(),
            chart: ChartConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from defaults, config file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, AnalysisError> {
        let mut builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AnalysisConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("horseracing").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Override with environment variables (HORSERACING__MISSING_THRESHOLD, HORSERACING__CHART__WIDTH, ...)
        let config = builder
            .add_source(
                config::Environment::with_prefix("HORSERACING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
