use chrono::NaiveDate;
use core_types::UnitMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The change of one instrument against a single anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDelta {
    pub anchor: String,
    /// The date the anchor was looked up for.
    pub anchor_date: NaiveDate,
    /// The date of the observation used as the anchor value.
    pub observed_on: Option<NaiveDate>,
    pub anchor_value: Option<Decimal>, // None when no value was close enough
    pub delta: Option<Decimal>,        // None for missing data or a zero percent base
}

/// Point-in-time performance of one instrument.
///
/// This struct is the final output of the `PerformanceEngine` and is what
/// the ranker, the scale classifier and the report assembler consume. A
/// `None` anywhere means "not available", never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub symbol: String,
    pub label: String,
    pub unit: UnitMode,
    /// The date the report was run for.
    pub reference_date: NaiveDate,
    /// The date the current value was observed on.
    pub as_of: Option<NaiveDate>,
    pub reference_value: Option<Decimal>,
    /// One entry per configured anchor, in configuration order.
    pub deltas: Vec<AnchorDelta>,
}

impl PerformanceResult {
    /// The delta for the named anchor, if it was computed.
    pub fn delta(&self, anchor: &str) -> Option<Decimal> {
        self.deltas
            .iter()
            .find(|d| d.anchor == anchor)
            .and_then(|d| d.delta)
    }

    /// True when the instrument had no current value at all.
    pub fn is_null(&self) -> bool {
        self.reference_value.is_none()
    }
}
