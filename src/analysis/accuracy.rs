//! Price accuracy
//!
//! Pairs every race winner with every runner of the same race (itself
//! included) and counts how often the winner was quoted at odds no longer
//! than the runner it is compared with.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::data::{odds_to_float, RaceTable};
use crate::error::{resolve_column, AnalysisError, AnalysisKind};
use crate::models::{OddsColumn, RaceEntry};

/// One (winner, runner) comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsPair {
    pub race_id: String,
    pub winner: Option<String>,
    pub runner: Option<String>,
    pub winner_odds: Option<f64>,
    pub runner_odds: Option<f64>,
}

impl OddsPair {
    /// Winner priced at or below the runner; a missing price never counts
    pub fn is_correct(&self) -> bool {
        matches!((self.winner_odds, self.runner_odds), (Some(w), Some(r)) if w <= r)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    pub column: OddsColumn,
    pub correct_predictions: usize,
    pub total_predictions: usize,
    pub accuracy: f64,
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Accuracy: {:.2}%",
            self.column.name(),
            self.accuracy * 100.0
        )
    }
}

/// Measure how well an odds column of the cleaned table picked the winners
pub fn price_accuracy(table: &RaceTable, column: &str) -> Result<AccuracyReport, AnalysisError> {
    let column = resolve_column(
        table,
        column,
        AnalysisKind::PriceAccuracy,
        OddsColumn::from_name,
    )?;
    let entries = table.entries()?;
    evaluate_accuracy(&entries, column)
}

/// Join winners back onto their races, one pair per runner
pub fn winner_pairs(entries: &[RaceEntry], column: OddsColumn) -> Vec<OddsPair> {
    let odds: Vec<Option<f64>> = entries
        .iter()
        .map(|e| e.odds(column).and_then(|v| odds_to_float(v).value()))
        .collect();

    let mut by_race: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(race_id) = entry.race_id.as_deref() {
            by_race.entry(race_id).or_default().push(i);
        }
    }

    let mut pairs = Vec::new();
    for (w, winner) in entries.iter().enumerate() {
        if !winner.is_winner() {
            continue;
        }
        let Some(race_id) = winner.race_id.as_deref() else {
            continue;
        };
        for &r in by_race.get(race_id).into_iter().flatten() {
            pairs.push(OddsPair {
                race_id: race_id.to_string(),
                winner: winner.horse_id.clone(),
                runner: entries[r].horse_id.clone(),
                winner_odds: odds[w],
                runner_odds: odds[r],
            });
        }
    }
    pairs
}

pub fn evaluate_accuracy(
    entries: &[RaceEntry],
    column: OddsColumn,
) -> Result<AccuracyReport, AnalysisError> {
    let pairs = winner_pairs(entries, column);
    for pair in &pairs {
        debug!(
            "race {}: winner {:?} at {:?} vs runner {:?} at {:?}",
            pair.race_id, pair.winner, pair.winner_odds, pair.runner, pair.runner_odds
        );
    }

    if pairs.is_empty() {
        return Err(AnalysisError::no_data(
            AnalysisKind::PriceAccuracy,
            "no winner could be paired with its race",
        ));
    }

    let correct_predictions = pairs.iter().filter(|p| p.is_correct()).count();
    let total_predictions = pairs.len();

    Ok(AccuracyReport {
        column,
        correct_predictions,
        total_predictions,
        accuracy: correct_predictions as f64 / total_predictions as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn entry(race: &str, horse: &str, won: bool, forecast: &str) -> RaceEntry {
        RaceEntry {
            race_id: Some(race.to_string()),
            horse_id: Some(horse.to_string()),
            won: Some(won),
            forecast_price: Some(forecast.to_string()),
            ..Default::default()
        }
    }

    /// Race 1 winner at 0.5 vs 2.0; race 2 winner at 3.0 vs 1.0
    fn two_races() -> Vec<RaceEntry> {
        vec![
            entry("1", "a", true, "1/2"),
            entry("1", "b", false, "2/1"),
            entry("2", "c", true, "3/1"),
            entry("2", "d", false, "1/1"),
        ]
    }

    #[test]
    fn test_pairs_include_self_comparison() {
        let pairs = winner_pairs(&two_races(), OddsColumn::ForecastPrice);

        assert_eq!(pairs.len(), 4);
        let self_pairs = pairs.iter().filter(|p| p.winner == p.runner).count();
        assert_eq!(self_pairs, 2);
    }

    #[test]
    fn test_accuracy_counts_self_pairs() {
        let report = evaluate_accuracy(&two_races(), OddsColumn::ForecastPrice).unwrap();

        assert_eq!(report.total_predictions, 4);
        assert_eq!(report.correct_predictions, 3);
        assert!((report.accuracy - 0.75).abs() < 1e-9);
        assert_eq!(report.to_string(), "ForecastPrice Accuracy: 75.00%");
    }

    #[test]
    fn test_unparseable_odds_count_as_incorrect() {
        let entries = vec![
            entry("1", "a", true, "Evens"),
            entry("1", "b", false, "2/1"),
        ];
        let report = evaluate_accuracy(&entries, OddsColumn::ForecastPrice).unwrap();

        assert_eq!(report.total_predictions, 2);
        assert_eq!(report.correct_predictions, 0);
    }

    #[test]
    fn test_no_winners_is_no_data() {
        let entries = vec![entry("1", "a", false, "1/2")];
        let err = evaluate_accuracy(&entries, OddsColumn::ForecastPrice).unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { .. }));
    }

    #[test]
    fn test_price_accuracy_rejects_columns() {
        let df = df!(
            "RaceID" => ["1", "1"],
            "HorseID" => ["a", "b"],
            "Won" => ["1", "0"],
            "StartingPrice" => ["1/2", "2/1"],
        )
        .unwrap();
        let table = RaceTable::from_dataframe(df);

        let err = price_accuracy(&table, "HorseID").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to calculate price accuracy for 'HorseID' column."
        );

        let err = price_accuracy(&table, "ForecastPrice").unwrap_err();
        assert_eq!(err.to_string(), "Column 'ForecastPrice' not present in dataframe.");

        let report = price_accuracy(&table, "StartingPrice").unwrap();
        assert_eq!(report.to_string(), "StartingPrice Accuracy: 100.00%");
    }
}
