use chrono::NaiveDate;
use thiserror::Error;

/// Per-instrument data conditions. These never abort a batch: the engine
/// turns them into null deltas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("No value within {max_lookback_days} day(s) on or before {target}")]
    MissingData {
        target: NaiveDate,
        max_lookback_days: u32,
    },

    #[error("Anchor value on {date} is zero; percent change is undefined")]
    DegenerateAnchor { date: NaiveDate },

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
