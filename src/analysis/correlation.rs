//! Wins by numeric attribute
//!
//! Buckets entries by each distinct WeightValue/Age, takes the share of
//! winners per bucket and regresses that share on the bucket value.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::regression::{linear_regression, LinearFit};
use crate::data::RaceTable;
use crate::error::{resolve_column, AnalysisError, AnalysisKind};
use crate::models::{NumericColumn, RaceEntry};

/// Wins within one distinct attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinBucket {
    pub value: f64,
    pub total_wins: usize,
    pub total_horses: usize,
    /// total_wins / total_horses
    pub weighted_average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub column: NumericColumn,
    pub buckets: Vec<WinBucket>,
    pub fit: LinearFit,
    pub significance_level: f64,
}

impl CorrelationReport {
    pub fn is_significant(&self) -> bool {
        self.fit.is_significant(self.significance_level)
    }

    pub fn verdict(&self) -> String {
        format!(
            "The slope is {}statistically significant at α = {} (p-value: {:.4}).",
            if self.is_significant() { "" } else { "not " },
            self.significance_level,
            self.fit.p_value
        )
    }
}

/// Bucket a column of the cleaned table and fit the win share against it
pub fn wins_by_value(
    table: &RaceTable,
    column: &str,
    significance_level: f64,
) -> Result<CorrelationReport, AnalysisError> {
    let column = resolve_column(table, column, AnalysisKind::WinsChart, NumericColumn::from_name)?;
    let entries = table.entries()?;
    correlate_wins(&entries, column, significance_level)
}

/// Per-value win buckets in ascending value order
pub fn win_buckets(entries: &[RaceEntry], column: NumericColumn) -> Vec<WinBucket> {
    let mut observed: Vec<(f64, bool)> = entries
        .iter()
        .filter_map(|e| {
            let value = e.numeric(column)?;
            let won = e.won?;
            // Fold -0.0 into 0.0 so both land in one bucket
            Some((value + 0.0, won))
        })
        .collect();
    observed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut buckets: Vec<WinBucket> = Vec::new();
    for (value, won) in observed {
        match buckets.last_mut() {
            Some(bucket) if bucket.value == value => {
                bucket.total_horses += 1;
                bucket.total_wins += usize::from(won);
            }
            _ => buckets.push(WinBucket {
                value,
                total_wins: usize::from(won),
                total_horses: 1,
                weighted_average: 0.0,
            }),
        }
    }

    for bucket in &mut buckets {
        bucket.weighted_average = bucket.total_wins as f64 / bucket.total_horses as f64;
    }
    buckets
}

pub fn correlate_wins(
    entries: &[RaceEntry],
    column: NumericColumn,
    significance_level: f64,
) -> Result<CorrelationReport, AnalysisError> {
    let buckets = win_buckets(entries, column);
    debug!("{}: {} distinct values", column.name(), buckets.len());

    let xs: Vec<f64> = buckets.iter().map(|b| b.value).collect();
    let ys: Vec<f64> = buckets.iter().map(|b| b.weighted_average).collect();

    let fit = linear_regression(&xs, &ys).ok_or_else(|| {
        AnalysisError::no_data(
            AnalysisKind::WinsChart,
            format!(
                "{} has {} distinct values, at least 2 are needed for a regression",
                column.name(),
                buckets.len()
            ),
        )
    })?;

    Ok(CorrelationReport {
        column,
        buckets,
        fit,
        significance_level,
    })
}

impl fmt::Display for CorrelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>10} {:>12} {:>16}",
            self.column.name(),
            "TotalWins",
            "TotalHorses",
            "WeightedAverage"
        )?;
        for b in &self.buckets {
            writeln!(
                f,
                "{:>12} {:>10} {:>12} {:>16.4}",
                b.value, b.total_wins, b.total_horses, b.weighted_average
            )?;
        }
        writeln!(
            f,
            "Regression: y = {:.6}x + {:.6} (r = {:.4})",
            self.fit.slope, self.fit.intercept, self.fit.r
        )?;
        write!(f, "{}", self.verdict())
    }
}
