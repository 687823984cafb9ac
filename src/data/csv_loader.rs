//! CSV data loading for race entries

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::error::AnalysisError;
use crate::models::{columns, parse_numeric, parse_won, RaceEntry};

/// In-memory race table
///
/// Every column is held as a string column so odds tokens such as "5-Jan"
/// survive loading verbatim; typed access goes through [`RaceTable::entries`].
#[derive(Debug, Clone)]
pub struct RaceTable {
    df: DataFrame,
}

impl RaceTable {
    /// Load race entries from CSV file
    pub fn load<P: AsRef<Path>>(csv_path: P) -> Result<Self, AnalysisError> {
        let path = csv_path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|source| AnalysisError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded {} rows x {} columns from {:?}",
            df.height(),
            df.width(),
            path
        );

        Ok(Self { df })
    }

    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_columns().iter().any(|c| c.name().as_str() == name)
    }

    /// Text of a column, cast to string; `None` if the column is absent
    pub fn string_column(&self, name: &str) -> Result<Option<StringChunked>, AnalysisError> {
        if !self.has_column(name) {
            return Ok(None);
        }
        let column = self.df.column(name)?.cast(&DataType::String)?;
        Ok(Some(column.str()?.clone()))
    }

    /// Convert the table into typed entries
    pub fn entries(&self) -> Result<Vec<RaceEntry>, AnalysisError> {
        let race_id = self.string_column(columns::RACE_ID)?;
        let horse_id = self.string_column(columns::HORSE_ID)?;
        let jockey_id = self.string_column(columns::JOCKEY_ID)?;
        let owner_id = self.string_column(columns::OWNER_ID)?;
        let trainer_id = self.string_column(columns::TRAINER_ID)?;
        let dam_id = self.string_column(columns::DAM_ID)?;
        let sire_id = self.string_column(columns::SIRE_ID)?;
        let dam_sire_id = self.string_column(columns::DAM_SIRE_ID)?;
        let sex = self.string_column(columns::SEX)?;
        let colour = self.string_column(columns::COLOUR)?;
        let weight_value = self.string_column(columns::WEIGHT_VALUE)?;
        let age = self.string_column(columns::AGE)?;
        let won = self.string_column(columns::WON)?;
        let forecast_price = self.string_column(columns::FORECAST_PRICE)?;
        let starting_price = self.string_column(columns::STARTING_PRICE)?;

        fn cell(col: &Option<StringChunked>, i: usize) -> Option<&str> {
            col.as_ref().and_then(|c| c.get(i))
        }
        fn text(col: &Option<StringChunked>, i: usize) -> Option<String> {
            cell(col, i).map(str::to_string)
        }

        let mut entries = Vec::with_capacity(self.height());
        for i in 0..self.height() {
            entries.push(RaceEntry {
                race_id: text(&race_id, i),
                horse_id: text(&horse_id, i),
                jockey_id: text(&jockey_id, i),
                owner_id: text(&owner_id, i),
                trainer_id: text(&trainer_id, i),
                dam_id: text(&dam_id, i),
                sire_id: text(&sire_id, i),
                dam_sire_id: text(&dam_sire_id, i),
                sex: text(&sex, i),
                colour: text(&colour, i),
                weight_value: cell(&weight_value, i).and_then(parse_numeric),
                age: cell(&age, i).and_then(parse_numeric),
                won: cell(&won, i).and_then(parse_won),
                forecast_price: text(&forecast_price, i),
                starting_price: text(&starting_price, i),
            });
        }

        Ok(entries)
    }

    /// Write the table back out as CSV
    pub fn write_csv<P: AsRef<Path>>(&self, csv_path: P) -> Result<(), AnalysisError> {
        let mut file = File::create(csv_path.as_ref())?;
        let mut df = self.df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;

        info!("Wrote {} rows to {:?}", df.height(), csv_path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_keeps_odds_text() {
        let file = write_csv(
            "RaceID,HorseID,Won,ForecastPrice,Age\n\
             1,10,1,5-Jan,4\n\
             1,11,0,7/2,\n",
        );

        let table = RaceTable::load(file.path()).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.column_names(),
            vec!["RaceID", "HorseID", "Won", "ForecastPrice", "Age"]
        );

        let entries = table.entries().unwrap();
        assert_eq!(entries[0].forecast_price.as_deref(), Some("5-Jan"));
        assert_eq!(entries[0].race_id.as_deref(), Some("1"));
        assert_eq!(entries[0].won, Some(true));
        assert_eq!(entries[0].age, Some(4.0));
        assert_eq!(entries[1].age, None);
        assert_eq!(entries[1].jockey_id, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RaceTable::load("/nonexistent/Horses.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::Load { .. }));
    }

    #[test]
    fn test_entries_cast_non_string_columns() {
        let df = df!(
            "RaceID" => [1i64, 2],
            "Won" => [1i64, 0],
            "WeightValue" => [126.0f64, 130.0],
        )
        .unwrap();
        let entries = RaceTable::from_dataframe(df).entries().unwrap();

        assert_eq!(entries[1].race_id.as_deref(), Some("2"));
        assert_eq!(entries[0].won, Some(true));
        assert_eq!(entries[1].weight_value, Some(130.0));
    }

    #[test]
    fn test_write_csv_round_trip() {
        let df = df!(
            "RaceID" => ["1", "2"],
            "HorseID" => ["10", "20"],
        )
        .unwrap();
        let table = RaceTable::from_dataframe(df);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        table.write_csv(&path).unwrap();

        let reloaded = RaceTable::load(&path).unwrap();
        assert_eq!(reloaded.height(), 2);
        assert!(reloaded.has_column("HorseID"));
    }
}
