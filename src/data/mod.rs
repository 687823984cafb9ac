//! Data loading, cleaning and odds normalization

pub mod cleaner;
pub mod csv_loader;
pub mod odds;

// Re-export commonly used types
pub use cleaner::{clean, CleanReport, MissingCount};
pub use csv_loader::RaceTable;
pub use odds::{date_to_odds, odds_to_float, OddsConversion};
