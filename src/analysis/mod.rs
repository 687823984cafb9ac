//! Analyses over the cleaned race table

pub mod accuracy;
#[cfg(feature = "chart")]
pub mod chart;
pub mod correlation;
pub mod regression;
pub mod wins;

pub use accuracy::{price_accuracy, AccuracyReport, OddsPair};
pub use correlation::{wins_by_value, CorrelationReport, WinBucket};
pub use regression::{linear_regression, LinearFit};
pub use wins::{win_data, GroupWins, WinReport};
