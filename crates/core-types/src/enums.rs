use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a performance delta is expressed for an instrument.
///
/// Prices move relative to their level, so they are compared in percent.
/// Yields are already rates, so the absolute change is what matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum UnitMode {
    Percent,
    BasisPoints,
}

impl UnitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitMode::Percent => "percent",
            UnitMode::BasisPoints => "basis_points",
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(UnitMode::Percent),
            "basis_points" | "bps" => Ok(UnitMode::BasisPoints),
            _ => Err(CoreError::InvalidUnitMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for UnitMode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where an anchor's comparison value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorBasis {
    /// The as-of value on `reference_date - offset_days`.
    #[default]
    Calendar,
    /// The observation immediately preceding the reference observation.
    PreviousObservation,
}
