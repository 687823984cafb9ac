//! Load → clean → analyse
//!
//! The pipeline loads and cleans one CSV, then runs an explicit list of
//! analyses against the cleaned table. Each analysis succeeds or fails on its
//! own; a rejected column does not stop the ones after it.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analysis::{
    price_accuracy, win_data, wins_by_value, AccuracyReport, CorrelationReport, WinReport,
};
use crate::config::AnalysisConfig;
use crate::data::{clean, CleanReport, RaceTable};
use crate::error::AnalysisError;

/// One requested analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisRequest {
    WinData {
        column: String,
        min_races: usize,
        top_n: usize,
    },
    WinsChart {
        column: String,
    },
    PriceAccuracy {
        column: String,
    },
}

impl AnalysisRequest {
    pub fn column(&self) -> &str {
        match self {
            AnalysisRequest::WinData { column, .. }
            | AnalysisRequest::WinsChart { column }
            | AnalysisRequest::PriceAccuracy { column } => column,
        }
    }
}

/// Result of one analysis
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    WinData(WinReport),
    WinsChart {
        report: CorrelationReport,
        chart: Option<PathBuf>,
    },
    PriceAccuracy(AccuracyReport),
}

impl fmt::Display for AnalysisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisOutcome::WinData(report) => write!(f, "{}", report),
            AnalysisOutcome::WinsChart { report, chart } => {
                write!(f, "{}", report)?;
                if let Some(path) = chart {
                    write!(f, "\nChart written to {}", path.display())?;
                }
                Ok(())
            }
            AnalysisOutcome::PriceAccuracy(report) => write!(f, "{}", report),
        }
    }
}

/// Everything produced by one pipeline run
#[derive(Debug)]
pub struct PipelineRun {
    pub clean: CleanReport,
    pub results: Vec<(AnalysisRequest, Result<AnalysisOutcome, AnalysisError>)>,
}

pub struct Pipeline {
    config: AnalysisConfig,
    #[cfg_attr(not(feature = "chart"), allow(dead_code))]
    render_charts: bool,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            render_charts: cfg!(feature = "chart"),
        }
    }

    /// Skip writing chart files (the regression is still computed)
    pub fn without_charts(mut self) -> Self {
        self.render_charts = false;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load and clean a CSV file
    pub fn prepare<P: AsRef<Path>>(&self, csv_path: P) -> Result<CleanReport, AnalysisError> {
        let raw = RaceTable::load(csv_path)?;
        clean(&raw, self.config.missing_threshold)
    }

    /// Run one analysis against a cleaned table
    pub fn execute(
        &self,
        table: &RaceTable,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        match request {
            AnalysisRequest::WinData {
                column,
                min_races,
                top_n,
            } => win_data(table, column, *min_races, *top_n).map(AnalysisOutcome::WinData),
            AnalysisRequest::WinsChart { column } => {
                let report = wins_by_value(table, column, self.config.significance_level)?;
                let chart = self.render(&report);
                Ok(AnalysisOutcome::WinsChart { report, chart })
            }
            AnalysisRequest::PriceAccuracy { column } => {
                price_accuracy(table, column).map(AnalysisOutcome::PriceAccuracy)
            }
        }
    }

    /// Load, clean and run every request in order
    pub fn run<P: AsRef<Path>>(
        &self,
        csv_path: P,
        requests: &[AnalysisRequest],
    ) -> Result<PipelineRun, AnalysisError> {
        let clean = self.prepare(csv_path)?;

        let results = requests
            .iter()
            .map(|request| {
                info!("Running {:?}", request);
                let result = self.execute(&clean.table, request);
                if let Err(e) = &result {
                    warn!("{}", e);
                }
                (request.clone(), result)
            })
            .collect();

        Ok(PipelineRun { clean, results })
    }

    #[cfg(feature = "chart")]
    fn render(&self, report: &CorrelationReport) -> Option<PathBuf> {
        if !self.render_charts {
            return None;
        }
        match crate::analysis::chart::render_wins_chart(report, &self.config.chart) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "chart"))]
    fn render(&self, _report: &CorrelationReport) -> Option<PathBuf> {
        None
    }
}
