use crate::error::AnalyzerError;
use core_types::UnitMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The seven heatmap levels, ordered from most negative to most positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLevel {
    StronglyNegative,
    Negative,
    SlightlyNegative,
    Neutral,
    SlightlyPositive,
    Positive,
    StronglyPositive,
}

impl ScaleLevel {
    /// Signed intensity in `-3..=3`.
    pub fn ordinal(&self) -> i8 {
        *self as i8 - 3
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScaleLevel::StronglyNegative => "strongly negative",
            ScaleLevel::Negative => "negative",
            ScaleLevel::SlightlyNegative => "slightly negative",
            ScaleLevel::Neutral => "neutral",
            ScaleLevel::SlightlyPositive => "slightly positive",
            ScaleLevel::Positive => "positive",
            ScaleLevel::StronglyPositive => "strongly positive",
        }
    }
}

/// A heatmap bucket and the interval of deltas that maps to it.
///
/// `None` bounds are unbounded. Positive buckets are closed below, negative
/// buckets are closed above, and the neutral bucket is open on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleClass {
    pub level: ScaleLevel,
    pub lower: Option<Decimal>,
    pub upper: Option<Decimal>,
}

/// Threshold magnitudes for one unit mode, mirrored around zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleThresholds {
    pub slight: Decimal,
    pub moderate: Decimal,
    pub strong: Decimal,
}

impl ScaleThresholds {
    pub fn new(slight: Decimal, moderate: Decimal, strong: Decimal) -> Self {
        Self {
            slight,
            moderate,
            strong,
        }
    }

    /// Defaults for relative (percent) changes.
    pub fn percent() -> Self {
        Self::new(Decimal::new(25, 2), Decimal::ONE, Decimal::new(3, 0))
    }

    /// Defaults for absolute yield changes (2, 5 and 15 bps).
    pub fn basis_points() -> Self {
        Self::new(Decimal::new(2, 2), Decimal::new(5, 2), Decimal::new(15, 2))
    }

    pub fn validate(&self, unit: UnitMode) -> Result<(), AnalyzerError> {
        let invalid = |reason: &str| AnalyzerError::InvalidThresholds {
            unit: unit.to_string(),
            reason: reason.to_string(),
        };
        if self.slight <= Decimal::ZERO {
            return Err(invalid("'slight' must be greater than zero"));
        }
        if self.moderate <= self.slight || self.strong <= self.moderate {
            return Err(invalid("thresholds must increase: slight < moderate < strong"));
        }
        Ok(())
    }

    /// Maps `delta` to exactly one bucket.
    pub fn classify(&self, delta: Decimal) -> ScaleClass {
        let Self {
            slight,
            moderate,
            strong,
        } = *self;
        let (level, lower, upper) = if delta >= strong {
            (ScaleLevel::StronglyPositive, Some(strong), None)
        } else if delta >= moderate {
            (ScaleLevel::Positive, Some(moderate), Some(strong))
        } else if delta >= slight {
            (ScaleLevel::SlightlyPositive, Some(slight), Some(moderate))
        } else if delta > -slight {
            (ScaleLevel::Neutral, Some(-slight), Some(slight))
        } else if delta > -moderate {
            (ScaleLevel::SlightlyNegative, Some(-moderate), Some(-slight))
        } else if delta > -strong {
            (ScaleLevel::Negative, Some(-strong), Some(-moderate))
        } else {
            (ScaleLevel::StronglyNegative, None, Some(-strong))
        };
        ScaleClass { level, lower, upper }
    }
}

/// Picks the threshold set matching each instrument's unit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleClassifier {
    pub percent: ScaleThresholds,
    pub basis_points: ScaleThresholds,
}

impl Default for ScaleClassifier {
    fn default() -> Self {
        Self {
            percent: ScaleThresholds::percent(),
            basis_points: ScaleThresholds::basis_points(),
        }
    }
}

impl ScaleClassifier {
    pub fn new(percent: ScaleThresholds, basis_points: ScaleThresholds) -> Result<Self, AnalyzerError> {
        percent.validate(UnitMode::Percent)?;
        basis_points.validate(UnitMode::BasisPoints)?;
        Ok(Self {
            percent,
            basis_points,
        })
    }

    pub fn thresholds(&self, unit: UnitMode) -> &ScaleThresholds {
        match unit {
            UnitMode::Percent => &self.percent,
            UnitMode::BasisPoints => &self.basis_points,
        }
    }

    pub fn classify(&self, delta: Decimal, unit: UnitMode) -> ScaleClass {
        self.thresholds(unit).classify(delta)
    }

    /// Classifies a report cell; a missing value has no bucket.
    pub fn classify_cell(&self, delta: Option<Decimal>, unit: UnitMode) -> Option<ScaleClass> {
        delta.map(|d| self.classify(d, unit))
    }
}
