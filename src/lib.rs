//! Horse racing analysis
//!
//! This library provides:
//! - CSV loading of race entries into a string-typed polars table
//! - Cleaning: odds token normalization, empty column and sparse-row removal
//! - Win data per jockey/trainer/sire/etc. with best and worst rankings
//! - Win share by weight or age with a linear fit and significance test
//! - Forecast/starting price accuracy against actual winners
//!
//! # Example
//!
//! ```no_run
//! use horseracing::config::AnalysisConfig;
//! use horseracing::pipeline::{AnalysisRequest, Pipeline};
//!
//! let pipeline = Pipeline::new(AnalysisConfig::default());
//! let run = pipeline
//!     .run(
//!         "Horses.csv",
//!         &[AnalysisRequest::PriceAccuracy {
//!             column: "ForecastPrice".to_string(),
//!         }],
//!     )
//!     .unwrap();
//!
//! println!("{}", run.clean);
//! for (_, result) in &run.results {
//!     match result {
//!         Ok(outcome) => println!("{:?}", outcome),
//!         Err(e) => println!("{}", e),
//!     }
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use analysis::{AccuracyReport, CorrelationReport, LinearFit, WinReport};
pub use crate::config::{AnalysisConfig, ChartConfig};
pub use data::{clean, CleanReport, OddsConversion, RaceTable};
pub use error::{AnalysisError, AnalysisKind};
pub use models::{GroupColumn, NumericColumn, OddsColumn, RaceEntry};
pub use pipeline::{AnalysisOutcome, AnalysisRequest, Pipeline, PipelineRun};
