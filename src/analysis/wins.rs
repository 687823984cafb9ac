//! Win Data
//!
//! Proportional wins (wins / distinct races) per jockey, trainer, sire, etc.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::data::RaceTable;
use crate::error::{resolve_column, AnalysisError, AnalysisKind};
use crate::models::{GroupColumn, RaceEntry};

/// Win record for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupWins {
    pub key: String,
    pub wins: usize,
    pub total_races: usize,
    pub proportional_wins: f64,
}

/// Best/worst groups for one column
#[derive(Debug, Clone, Serialize)]
pub struct WinReport {
    pub column: GroupColumn,
    pub min_races: usize,
    pub top_n: usize,
    /// Every group tied at the highest rate
    pub best: Vec<GroupWins>,
    pub top: Vec<GroupWins>,
    /// Every group tied at the lowest rate
    pub worst: Vec<GroupWins>,
    pub bottom: Vec<GroupWins>,
}

/// Calculate win data for a column of the cleaned table
pub fn win_data(
    table: &RaceTable,
    column: &str,
    min_races: usize,
    top_n: usize,
) -> Result<WinReport, AnalysisError> {
    let column = resolve_column(table, column, AnalysisKind::WinData, GroupColumn::from_name)?;
    let entries = table.entries()?;
    aggregate_wins(&entries, column, min_races, top_n)
}

/// Group entries by `column` and rank groups by proportional wins
pub fn aggregate_wins(
    entries: &[RaceEntry],
    column: GroupColumn,
    min_races: usize,
    top_n: usize,
) -> Result<WinReport, AnalysisError> {
    let mut wins: HashMap<&str, usize> = HashMap::new();
    let mut races: HashMap<&str, HashSet<&str>> = HashMap::new();

    for entry in entries {
        let Some(key) = entry.group_key(column) else {
            continue;
        };
        let group_races = races.entry(key).or_default();
        if let Some(race_id) = entry.race_id.as_deref() {
            group_races.insert(race_id);
        }
        if entry.is_winner() {
            *wins.entry(key).or_default() += 1;
        }
    }

    let groups: Vec<GroupWins> = races
        .into_iter()
        .map(|(key, race_ids)| (key, race_ids.len()))
        .filter(|(_, total_races)| *total_races > 0 && *total_races >= min_races)
        .map(|(key, total_races)| {
            let won = wins.get(key).copied().unwrap_or(0);
            GroupWins {
                key: key.to_string(),
                wins: won,
                total_races,
                proportional_wins: won as f64 / total_races as f64,
            }
        })
        .collect();

    debug!(
        "{}: {} groups with at least {} races",
        column.name(),
        groups.len(),
        min_races
    );

    if groups.is_empty() {
        return Err(AnalysisError::no_data(
            AnalysisKind::WinData,
            format!("no {} group has at least {} races", column.name(), min_races),
        ));
    }

    // Rate ties: fewer races first on the best side, more races first on the worst side
    let mut ranked_best = groups.clone();
    ranked_best.sort_by(|a, b| {
        b.proportional_wins
            .total_cmp(&a.proportional_wins)
            .then(a.total_races.cmp(&b.total_races))
            .then_with(|| a.key.cmp(&b.key))
    });
    let mut ranked_worst = groups;
    ranked_worst.sort_by(|a, b| {
        a.proportional_wins
            .total_cmp(&b.proportional_wins)
            .then(b.total_races.cmp(&a.total_races))
            .then_with(|| a.key.cmp(&b.key))
    });

    let max_rate = ranked_best[0].proportional_wins;
    let min_rate = ranked_worst[0].proportional_wins;

    Ok(WinReport {
        column,
        min_races,
        top_n,
        best: ranked_best
            .iter()
            .filter(|g| g.proportional_wins == max_rate)
            .cloned()
            .collect(),
        top: ranked_best.iter().take(top_n).cloned().collect(),
        worst: ranked_worst
            .iter()
            .filter(|g| g.proportional_wins == min_rate)
            .cloned()
            .collect(),
        bottom: ranked_worst.iter().take(top_n).cloned().collect(),
    })
}

fn write_groups(f: &mut fmt::Formatter<'_>, column: &str, groups: &[GroupWins]) -> fmt::Result {
    writeln!(f, "{:>12} {:>18} {:>12}", column, "ProportionalWins", "TotalRaces")?;
    for g in groups {
        writeln!(
            f,
            "{:>12} {:>18.6} {:>12}",
            g.key, g.proportional_wins, g.total_races
        )?;
    }
    Ok(())
}

impl fmt::Display for WinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = self.column.name();
        writeln!(f, "Best:")?;
        write_groups(f, column, &self.best)?;
        writeln!(f, "Top {}:", self.top_n)?;
        write_groups(f, column, &self.top)?;
        writeln!(f, "Worst:")?;
        write_groups(f, column, &self.worst)?;
        writeln!(f, "Bottom {}:", self.top_n)?;
        write_groups(f, column, &self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn entry(race: &str, jockey: &str, won: bool) -> RaceEntry {
        RaceEntry {
            race_id: Some(race.to_string()),
            jockey_id: Some(jockey.to_string()),
            won: Some(won),
            ..Default::default()
        }
    }

    /// Jockey A: 3 wins in 10 races, jockey B: 1 win in 2 races
    fn sample_entries() -> Vec<RaceEntry> {
        let mut entries = Vec::new();
        for race in 0..10 {
            entries.push(entry(&format!("a{race}"), "A", race < 3));
        }
        entries.push(entry("b0", "B", true));
        entries.push(entry("b1", "B", false));
        entries
    }

    #[test]
    fn test_proportional_wins() {
        let report = aggregate_wins(&sample_entries(), GroupColumn::JockeyId, 2, 1).unwrap();

        assert_eq!(report.top.len(), 1);
        assert_eq!(report.top[0].key, "B");
        assert!((report.top[0].proportional_wins - 0.5).abs() < 1e-9);

        assert_eq!(report.bottom.len(), 1);
        assert_eq!(report.bottom[0].key, "A");
        assert!((report.bottom[0].proportional_wins - 0.3).abs() < 1e-9);
        assert_eq!(report.bottom[0].total_races, 10);
    }

    #[test]
    fn test_race_threshold_filters_groups() {
        let report = aggregate_wins(&sample_entries(), GroupColumn::JockeyId, 3, 5).unwrap();

        assert_eq!(report.best.len(), 1);
        assert_eq!(report.best[0].key, "A");
        assert_eq!(report.worst[0].key, "A");
        assert_eq!(report.top.len(), 1);
    }

    #[test]
    fn test_ties_include_every_group() {
        let entries = vec![
            entry("1", "A", true),
            entry("2", "B", true),
            entry("3", "C", false),
            entry("4", "D", false),
        ];
        let report = aggregate_wins(&entries, GroupColumn::JockeyId, 1, 1).unwrap();

        let best: Vec<_> = report.best.iter().map(|g| g.key.as_str()).collect();
        let worst: Vec<_> = report.worst.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(best, vec!["A", "B"]);
        assert_eq!(worst, vec!["C", "D"]);
        assert_eq!(report.top.len(), 1);
    }

    #[test]
    fn test_races_counted_distinct() {
        // Two rows for the same jockey in the same race count as one race
        let entries = vec![
            entry("1", "A", true),
            entry("1", "A", false),
            entry("2", "A", false),
        ];
        let report = aggregate_wins(&entries, GroupColumn::JockeyId, 1, 1).unwrap();

        assert_eq!(report.best[0].total_races, 2);
        assert!((report.best[0].proportional_wins - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_keys_ignored() {
        let mut entries = sample_entries();
        entries.push(RaceEntry {
            race_id: Some("x".to_string()),
            won: Some(true),
            ..Default::default()
        });
        let report = aggregate_wins(&entries, GroupColumn::JockeyId, 1, 5).unwrap();
        assert_eq!(report.top.len(), 2);
    }

    #[test]
    fn test_no_group_passes_threshold() {
        let err = aggregate_wins(&sample_entries(), GroupColumn::JockeyId, 11, 1).unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { .. }));
    }

    #[test]
    fn test_win_data_rejects_columns() {
        let df = df!(
            "RaceID" => ["1", "2"],
            "JockeyID" => ["A", "B"],
            "Won" => ["1", "0"],
        )
        .unwrap();
        let table = RaceTable::from_dataframe(df);

        let err = win_data(&table, "Won", 1, 1).unwrap_err();
        assert_eq!(err.to_string(), "Unable to calculate win data 'Won' column.");

        let err = win_data(&table, "TrainerID", 1, 1).unwrap_err();
        assert_eq!(err.to_string(), "Column 'TrainerID' not present in dataframe.");

        let report = win_data(&table, "JockeyID", 1, 1).unwrap();
        assert_eq!(report.best[0].key, "A");
    }

    #[test]
    fn test_display_sections() {
        let report = aggregate_wins(&sample_entries(), GroupColumn::JockeyId, 2, 1).unwrap();
        let text = report.to_string();
        assert!(text.contains("Best:"));
        assert!(text.contains("Top 1:"));
        assert!(text.contains("Worst:"));
        assert!(text.contains("Bottom 1:"));
        assert!(text.contains("ProportionalWins"));
    }
}
