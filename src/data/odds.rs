//! Odds token normalization
//!
//! Race cards carry odds as fractions ("5/1"), but spreadsheet round trips
//! turn some of them into day-month dates ("5-Jan"). Both conversions here are
//! total: malformed input degrades to a pass-through or a missing value.

use chrono::{Datelike, NaiveDate};

/// Non-leap reference year for validating day-month tokens ("29-Feb" is rejected)
const REFERENCE_YEAR: i32 = 1900;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Outcome of an odds conversion
#[derive(Debug, Clone, PartialEq)]
pub enum OddsConversion<T> {
    /// Input parsed and converted
    Converted(T),
    /// Input left as it was
    PassThrough(String),
    /// Input cannot be expressed as a value
    Unrepresentable,
}

impl<T> OddsConversion<T> {
    /// Converted value, if any
    pub fn value(self) -> Option<T> {
        match self {
            OddsConversion::Converted(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, OddsConversion::Converted(_))
    }
}

impl OddsConversion<String> {
    /// Text to store back into the table
    pub fn into_text(self) -> Option<String> {
        match self {
            OddsConversion::Converted(text) | OddsConversion::PassThrough(text) => Some(text),
            OddsConversion::Unrepresentable => None,
        }
    }
}

/// Convert a day-month token ("5-Jan") into fractional odds text ("5/1").
///
/// Anything that is not a valid day-month token is passed through unchanged.
pub fn date_to_odds(value: &str) -> OddsConversion<String> {
    match parse_day_month(value) {
        Some(date) => OddsConversion::Converted(format!("{}/{}", date.day(), date.month())),
        None => OddsConversion::PassThrough(value.to_string()),
    }
}

fn parse_day_month(value: &str) -> Option<NaiveDate> {
    let (day, month) = value.split_once('-')?;
    if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = day.parse().ok()?;

    let month = month.to_ascii_lowercase();
    let month = MONTH_ABBREVIATIONS.iter().position(|m| *m == month)? as u32 + 1;

    NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
}

/// Convert fractional odds text ("5/2") to a float (2.5).
///
/// Wrong shape, non-numeric parts, a zero denominator or a non-finite result
/// all yield `Unrepresentable`.
pub fn odds_to_float(value: &str) -> OddsConversion<f64> {
    let Some((numerator, denominator)) = value.split_once('/') else {
        return OddsConversion::Unrepresentable;
    };
    if denominator.contains('/') {
        return OddsConversion::Unrepresentable;
    }

    let (Ok(numerator), Ok(denominator)) = (
        numerator.trim().parse::<f64>(),
        denominator.trim().parse::<f64>(),
    ) else {
        return OddsConversion::Unrepresentable;
    };

    if denominator == 0.0 {
        return OddsConversion::Unrepresentable;
    }

    let odds = numerator / denominator;
    if odds.is_finite() {
        OddsConversion::Converted(odds)
    } else {
        OddsConversion::Unrepresentable
    }
}
