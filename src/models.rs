//! Race entry rows and the columns each analysis accepts

use serde::{Deserialize, Serialize};

/// CSV header names used by the analyses
pub mod columns {
    pub const RACE_ID: &str = "RaceID";
    pub const HORSE_ID: &str = "HorseID";
    pub const JOCKEY_ID: &str = "JockeyID";
    pub const OWNER_ID: &str = "OwnerID";
    pub const TRAINER_ID: &str = "TrainerID";
    pub const DAM_ID: &str = "DamID";
    pub const SIRE_ID: &str = "SireID";
    pub const DAM_SIRE_ID: &str = "DamSireID";
    pub const SEX: &str = "Sex";
    pub const COLOUR: &str = "Colour";
    pub const WEIGHT_VALUE: &str = "WeightValue";
    pub const AGE: &str = "Age";
    pub const WON: &str = "Won";
    pub const FORECAST_PRICE: &str = "ForecastPrice";
    pub const STARTING_PRICE: &str = "StartingPrice";
}

/// One horse's participation in one race
///
/// Every field is optional: the column may have been dropped during cleaning
/// or the cell may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceEntry {
    pub race_id: Option<String>,
    pub horse_id: Option<String>,
    pub jockey_id: Option<String>,
    pub owner_id: Option<String>,
    pub trainer_id: Option<String>,
    pub dam_id: Option<String>,
    pub sire_id: Option<String>,
    pub dam_sire_id: Option<String>,
    pub sex: Option<String>,
    pub colour: Option<String>,
    pub weight_value: Option<f64>,
    pub age: Option<f64>,
    pub won: Option<bool>,
    pub forecast_price: Option<String>,
    pub starting_price: Option<String>,
}

impl RaceEntry {
    pub fn group_key(&self, column: GroupColumn) -> Option<&str> {
        let value = match column {
            GroupColumn::HorseId => &self.horse_id,
            GroupColumn::JockeyId => &self.jockey_id,
            GroupColumn::OwnerId => &self.owner_id,
            GroupColumn::TrainerId => &self.trainer_id,
            GroupColumn::DamId => &self.dam_id,
            GroupColumn::SireId => &self.sire_id,
            GroupColumn::DamSireId => &self.dam_sire_id,
            GroupColumn::Sex => &self.sex,
            GroupColumn::Colour => &self.colour,
        };
        value.as_deref()
    }

    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::WeightValue => self.weight_value,
            NumericColumn::Age => self.age,
        }
    }

    pub fn odds(&self, column: OddsColumn) -> Option<&str> {
        match column {
            OddsColumn::ForecastPrice => self.forecast_price.as_deref(),
            OddsColumn::StartingPrice => self.starting_price.as_deref(),
        }
    }

    pub fn is_winner(&self) -> bool {
        self.won == Some(true)
    }
}

/// Parse a Won cell: `1`/`0`, `1.0`/`0.0` or `true`/`false`
pub fn parse_won(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match value.parse::<f64>() {
        Ok(v) if v == 1.0 => Some(true),
        Ok(v) if v == 0.0 => Some(false),
        _ => None,
    }
}

/// Parse a numeric attribute cell; unparseable text counts as missing
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Columns accepted by the win-data aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupColumn {
    HorseId,
    JockeyId,
    OwnerId,
    TrainerId,
    DamId,
    SireId,
    DamSireId,
    Sex,
    Colour,
}

impl GroupColumn {
    pub const ALL: [GroupColumn; 9] = [
        GroupColumn::HorseId,
        GroupColumn::JockeyId,
        GroupColumn::OwnerId,
        GroupColumn::TrainerId,
        GroupColumn::DamId,
        GroupColumn::SireId,
        GroupColumn::DamSireId,
        GroupColumn::Sex,
        GroupColumn::Colour,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroupColumn::HorseId => columns::HORSE_ID,
            GroupColumn::JockeyId => columns::JOCKEY_ID,
            GroupColumn::OwnerId => columns::OWNER_ID,
            GroupColumn::TrainerId => columns::TRAINER_ID,
            GroupColumn::DamId => columns::DAM_ID,
            GroupColumn::SireId => columns::SIRE_ID,
            GroupColumn::DamSireId => columns::DAM_SIRE_ID,
            GroupColumn::Sex => columns::SEX,
            GroupColumn::Colour => columns::COLOUR,
        }
    }
}

/// Columns accepted by the wins-by-value correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    WeightValue,
    Age,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 2] = [NumericColumn::WeightValue, NumericColumn::Age];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::WeightValue => columns::WEIGHT_VALUE,
            NumericColumn::Age => columns::AGE,
        }
    }
}

/// Odds columns accepted by the price-accuracy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddsColumn {
    ForecastPrice,
    StartingPrice,
}

impl OddsColumn {
    pub const ALL: [OddsColumn; 2] = [OddsColumn::ForecastPrice, OddsColumn::StartingPrice];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OddsColumn::ForecastPrice => columns::FORECAST_PRICE,
            OddsColumn::StartingPrice => columns::STARTING_PRICE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_won() {
        assert_eq!(parse_won("1"), Some(true));
        assert_eq!(parse_won("0"), Some(false));
        assert_eq!(parse_won("1.0"), Some(true));
        assert_eq!(parse_won(" TRUE "), Some(true));
        assert_eq!(parse_won("2"), None);
        assert_eq!(parse_won("yes"), None);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("126"), Some(126.0));
        assert_eq!(parse_numeric(" 4.5"), Some(4.5));
        assert_eq!(parse_numeric("9-0"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in GroupColumn::ALL {
            assert_eq!(GroupColumn::from_name(column.name()), Some(column));
        }
        assert_eq!(NumericColumn::from_name("Age"), Some(NumericColumn::Age));
        assert_eq!(NumericColumn::from_name("age"), None);
        assert_eq!(OddsColumn::from_name("StartingPrice"), Some(OddsColumn::StartingPrice));
        assert_eq!(GroupColumn::from_name("RaceID"), None);
    }

    #[test]
    fn test_entry_accessors() {
        let entry = RaceEntry {
            jockey_id: Some("J7".to_string()),
            age: Some(5.0),
            forecast_price: Some("5/1".to_string()),
            won: Some(true),
            ..Default::default()
        };

        assert_eq!(entry.group_key(GroupColumn::JockeyId), Some("J7"));
        assert_eq!(entry.group_key(GroupColumn::HorseId), None);
        assert_eq!(entry.numeric(NumericColumn::Age), Some(5.0));
        assert_eq!(entry.odds(OddsColumn::ForecastPrice), Some("5/1"));
        assert!(entry.is_winner());
    }
}
