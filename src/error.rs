use polars::prelude::PolarsError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::RaceTable;

/// The three column-driven analyses, used to phrase rejection messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    WinData,
    WinsChart,
    PriceAccuracy,
}

impl AnalysisKind {
    /// Verb phrase used in "Unable to ... 'X' column."
    pub fn action(&self) -> &'static str {
        match self {
            AnalysisKind::WinData => "calculate win data",
            AnalysisKind::WinsChart => "plot chart for",
            AnalysisKind::PriceAccuracy => "calculate price accuracy for",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::WinData => write!(f, "win data"),
            AnalysisKind::WinsChart => write!(f, "wins chart"),
            AnalysisKind::PriceAccuracy => write!(f, "price accuracy"),
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Column exists but the analysis does not accept it
    #[error("Unable to {} '{column}' column.", .analysis.action())]
    UnsupportedColumn { column: String, analysis: AnalysisKind },

    /// Column is not in the table at all
    #[error("Column '{column}' not present in dataframe.")]
    MissingColumn { column: String },

    /// Nothing left to compute on after filtering
    #[error("No data for {analysis}: {reason}")]
    NoData { analysis: AnalysisKind, reason: String },

    #[error("Failed to load CSV from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Table error: {0}")]
    Table(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AnalysisError {
    pub fn no_data(analysis: AnalysisKind, reason: impl Into<String>) -> Self {
        AnalysisError::NoData {
            analysis,
            reason: reason.into(),
        }
    }

    /// Whether this is a per-analysis condition the caller reports and moves past
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedColumn { .. }
                | AnalysisError::MissingColumn { .. }
                | AnalysisError::NoData { .. }
                | AnalysisError::Chart(_)
        )
    }
}

/// Validate a column argument against an analysis allow-list and the table.
///
/// `parse` maps a header name onto the analysis' column enum; `None` means the
/// analysis does not support that column.
pub fn resolve_column<T>(
    table: &RaceTable,
    column: &str,
    analysis: AnalysisKind,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, AnalysisError> {
    let present = table.has_column(column);
    match parse(column) {
        Some(resolved) if present => Ok(resolved),
        None if present => Err(AnalysisError::UnsupportedColumn {
            column: column.to_string(),
            analysis,
        }),
        _ => Err(AnalysisError::MissingColumn {
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupColumn, OddsColumn};
    use polars::prelude::*;

    fn table() -> RaceTable {
        let df = df!(
            "RaceID" => ["1", "1"],
            "HorseID" => ["10", "11"],
            "Won" => ["1", "0"],
        )
        .unwrap();
        RaceTable::from_dataframe(df)
    }

    #[test]
    fn test_resolve_supported_column() {
        let resolved =
            resolve_column(&table(), "HorseID", AnalysisKind::WinData, GroupColumn::from_name);
        assert_eq!(resolved.unwrap(), GroupColumn::HorseId);
    }

    #[test]
    fn test_resolve_unsupported_column() {
        let err = resolve_column(&table(), "Won", AnalysisKind::WinData, GroupColumn::from_name)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedColumn { .. }));
        assert_eq!(err.to_string(), "Unable to calculate win data 'Won' column.");
    }

    #[test]
    fn test_resolve_absent_column() {
        let err = resolve_column(&table(), "Going", AnalysisKind::WinData, GroupColumn::from_name)
            .unwrap_err();
        assert_eq!(err.to_string(), "Column 'Going' not present in dataframe.");
    }

    #[test]
    fn test_supported_but_dropped_column_is_absent() {
        let err = resolve_column(
            &table(),
            "ForecastPrice",
            AnalysisKind::PriceAccuracy,
            OddsColumn::from_name,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { .. }));
    }

    #[test]
    fn test_error_messages_per_analysis() {
        let chart = AnalysisError::UnsupportedColumn {
            column: "HorseID".to_string(),
            analysis: AnalysisKind::WinsChart,
        };
        assert_eq!(chart.to_string(), "Unable to plot chart for 'HorseID' column.");

        let accuracy = AnalysisError::UnsupportedColumn {
            column: "Age".to_string(),
            analysis: AnalysisKind::PriceAccuracy,
        };
        assert_eq!(
            accuracy.to_string(),
            "Unable to calculate price accuracy for 'Age' column."
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AnalysisError::no_data(AnalysisKind::WinData, "empty").is_recoverable());
        assert!(AnalysisError::Chart("x".to_string()).is_recoverable());
        assert!(!AnalysisError::Io(std::io::Error::other("disk")).is_recoverable());
    }
}
