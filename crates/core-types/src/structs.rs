use crate::enums::{AnchorBasis, UnitMode};
use crate::error::CoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tracked market instrument: an exchange ticker or an economic series code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Provider identifier, e.g. "SPY" or "DGS10".
    pub symbol: String,
    /// Human-readable name shown in the report.
    pub label: String,
    /// Identifier of the asset class section the instrument belongs to.
    pub asset_class: String,
    pub unit: UnitMode,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        label: impl Into<String>,
        asset_class: impl Into<String>,
        unit: UnitMode,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
            asset_class: asset_class.into(),
            unit,
        }
    }
}

/// Longest lookback an anchor may declare, roughly ten years.
pub const MAX_OFFSET_DAYS: u32 = 3_660;

/// A named lookback against which performance is measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub name: String,
    /// Calendar days subtracted from the reference date.
    pub offset_days: u32,
    #[serde(default)]
    pub basis: AnchorBasis,
    /// Overrides the run-wide staleness ceiling for this anchor only.
    #[serde(default)]
    pub max_lookback_days: Option<u32>,
}

impl AnchorSpec {
    pub fn calendar(name: impl Into<String>, offset_days: u32) -> Self {
        Self {
            name: name.into(),
            offset_days,
            basis: AnchorBasis::Calendar,
            max_lookback_days: None,
        }
    }

    pub fn with_basis(mut self, basis: AnchorBasis) -> Self {
        self.basis = basis;
        self
    }

    /// The standard day / week / month lookbacks.
    pub fn defaults() -> Vec<AnchorSpec> {
        vec![
            AnchorSpec::calendar("day", 1),
            AnchorSpec::calendar("week", 7),
            AnchorSpec::calendar("month", 30),
        ]
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidAnchor {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if self.offset_days == 0 {
            return Err(CoreError::InvalidAnchor {
                name: self.name.clone(),
                reason: "offset_days must be at least 1".to_string(),
            });
        }
        if self.offset_days > MAX_OFFSET_DAYS {
            return Err(CoreError::InvalidAnchor {
                name: self.name.clone(),
                reason: format!("offset_days must be at most {MAX_OFFSET_DAYS}"),
            });
        }
        Ok(())
    }
}

/// A single observation as delivered by a data provider, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: NaiveDateTime,
    pub value: Decimal,
}

impl RawObservation {
    pub fn new(timestamp: NaiveDateTime, value: Decimal) -> Self {
        Self { timestamp, value }
    }
}
