//! Race table cleaning
//!
//! Normalizes the odds columns, drops columns that carry no data and drops
//! rows missing a value in any sparsely-missing column.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::csv_loader::RaceTable;
use super::odds::date_to_odds;
use crate::error::AnalysisError;
use crate::models::columns;

/// Columns holding odds text subject to day-month normalization
const ODDS_COLUMNS: [&str; 2] = [columns::FORECAST_PRICE, columns::STARTING_PRICE];

/// Text written for a blank odds cell; never parses as a fraction
pub const MISSING_ODDS_TEXT: &str = "nan";

/// Missing-value count for one column of the raw table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Result of cleaning a race table
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    #[serde(skip)]
    pub table: RaceTable,
    pub dropped_columns: Vec<String>,
    /// Zero-based row positions in the raw table
    pub dropped_rows: Vec<usize>,
    pub missing_counts: Vec<MissingCount>,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dropped the following columns as they contain no data: {:?}",
            self.dropped_columns
        )?;
        write!(
            f,
            "Dropped the following rows as they contained insufficient data: {:?}",
            self.dropped_rows
        )
    }
}

/// Clean a raw race table.
///
/// Columns with `missing_threshold` or more missing values are kept as they
/// are and do not cause rows to be dropped.
pub fn clean(raw: &RaceTable, missing_threshold: usize) -> Result<CleanReport, AnalysisError> {
    let mut df = raw.dataframe().clone();
    normalize_odds_columns(&mut df)?;

    let rows_before = df.height();
    let missing_counts: Vec<MissingCount> = df
        .get_columns()
        .iter()
        .map(|c| MissingCount {
            column: c.name().to_string(),
            missing: c.null_count(),
        })
        .collect();

    // An empty table gives no evidence that a column is empty
    let dropped_columns: Vec<String> = missing_counts
        .iter()
        .filter(|m| rows_before > 0 && m.missing == rows_before)
        .map(|m| m.column.clone())
        .collect();
    for column in &dropped_columns {
        df = df.drop(column)?;
    }

    let required: Vec<&str> = missing_counts
        .iter()
        .filter(|m| m.missing < missing_threshold && !dropped_columns.contains(&m.column))
        .map(|m| m.column.as_str())
        .collect();
    debug!("Columns required to be complete: {:?}", required);

    let mut keep = vec![true; rows_before];
    for name in &required {
        let present = df.column(name)?.is_not_null();
        for (row, is_present) in (&present).into_iter().enumerate() {
            if is_present != Some(true) {
                keep[row] = false;
            }
        }
    }

    let dropped_rows: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter(|(_, kept)| !**kept)
        .map(|(row, _)| row)
        .collect();

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let df = df.filter(&mask)?;
    let rows_after = df.height();

    info!(
        "Cleaned table: dropped {} columns and {} rows ({} rows remain)",
        dropped_columns.len(),
        dropped_rows.len(),
        rows_after
    );

    Ok(CleanReport {
        table: RaceTable::from_dataframe(df),
        dropped_columns,
        dropped_rows,
        missing_counts,
        rows_before,
        rows_after,
    })
}

/// Rewrite day-month tokens in the odds columns as fractional odds text.
///
/// Blank cells become [`MISSING_ODDS_TEXT`], so odds columns never count as
/// missing and never cause a row or column to be dropped.
fn normalize_odds_columns(df: &mut DataFrame) -> Result<(), AnalysisError> {
    for name in ODDS_COLUMNS {
        if !df.get_columns().iter().any(|c| c.name().as_str() == name) {
            continue;
        }

        let column = df.column(name)?.cast(&DataType::String)?;
        let normalized: StringChunked = column
            .str()?
            .into_iter()
            .map(|value| match value {
                Some(v) => date_to_odds(v).into_text(),
                None => Some(MISSING_ODDS_TEXT.to_string()),
            })
            .collect();

        df.with_column(normalized.with_name(name.into()).into_series())?;
    }
    Ok(())
}
