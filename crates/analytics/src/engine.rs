use crate::error::AnalyticsError;
use crate::report::{AnchorDelta, PerformanceResult};
use crate::resolver::{resolve_as_of, staleness_days, AsOf};
use chrono::{Days, NaiveDate};
use core_types::{AnchorBasis, AnchorSpec, Instrument, TimeSeries, UnitMode};
use rust_decimal::Decimal;

/// How far lookups may reach back before a value counts as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackPolicy {
    /// Staleness ceiling for anchor lookups, unless an anchor overrides it.
    pub max_lookback_days: u32,
    /// Staleness ceiling for the current value, e.g. to bridge a weekend.
    pub reference_lookback_days: u32,
}

impl Default for LookbackPolicy {
    fn default() -> Self {
        Self {
            max_lookback_days: 5,
            reference_lookback_days: 4,
        }
    }
}

/// A stateless calculator for deriving anchor deltas from daily series.
#[derive(Debug, Clone)]
pub struct PerformanceEngine {
    anchors: Vec<AnchorSpec>,
    policy: LookbackPolicy,
}

impl PerformanceEngine {
    pub fn new(anchors: Vec<AnchorSpec>, policy: LookbackPolicy) -> Self {
        Self { anchors, policy }
    }

    pub fn anchors(&self) -> &[AnchorSpec] {
        &self.anchors
    }

    /// Computes the performance of one instrument as of `reference_date`.
    ///
    /// Missing or degenerate data never fails the call: the affected fields
    /// come back as `None`. If no current value exists, every delta is `None`.
    pub fn compute(
        &self,
        instrument: &Instrument,
        series: &TimeSeries,
        reference_date: NaiveDate,
    ) -> PerformanceResult {
        let reference = match resolve_as_of(series, reference_date, self.policy.reference_lookback_days) {
            Ok(as_of) => Some(as_of),
            Err(e) => {
                tracing::debug!(symbol = %instrument.symbol, points = series.len(), "No current value: {}", e);
                None
            }
        };

        let deltas = self
            .anchors
            .iter()
            .map(|anchor| self.anchor_delta(instrument, series, reference_date, reference, anchor))
            .collect();

        PerformanceResult {
            symbol: instrument.symbol.clone(),
            label: instrument.label.clone(),
            unit: instrument.unit,
            reference_date,
            as_of: reference.map(|r| r.date),
            reference_value: reference.map(|r| r.value),
            deltas,
        }
    }

    /// Computes every instrument of a batch, preserving input order.
    pub fn compute_batch<'a, I>(&self, batch: I, reference_date: NaiveDate) -> Vec<PerformanceResult>
    where
        I: IntoIterator<Item = (&'a Instrument, &'a TimeSeries)>,
    {
        let results: Vec<PerformanceResult> = batch
            .into_iter()
            .map(|(instrument, series)| self.compute(instrument, series, reference_date))
            .collect();

        let missing = results.iter().filter(|r| r.is_null()).count();
        if missing > 0 {
            tracing::warn!(missing, total = results.len(), "Some instruments have no current value.");
        }
        results
    }

    fn anchor_delta(
        &self,
        instrument: &Instrument,
        series: &TimeSeries,
        reference_date: NaiveDate,
        reference: Option<AsOf>,
        anchor: &AnchorSpec,
    ) -> AnchorDelta {
        let offset = Days::new(u64::from(anchor.offset_days));
        let mut out = AnchorDelta {
            anchor: anchor.name.clone(),
            anchor_date: reference_date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN),
            observed_on: None,
            anchor_value: None,
            delta: None,
        };
        let Some(reference) = reference else {
            return out;
        };

        let ceiling = anchor.max_lookback_days.unwrap_or(self.policy.max_lookback_days);
        let resolved = match anchor.basis {
            AnchorBasis::Calendar => match reference_date.checked_sub_days(offset) {
                Some(target) => resolve_as_of(series, target, ceiling),
                None => Err(out_of_range(reference_date, anchor)),
            },
            AnchorBasis::PreviousObservation => match reference.date.checked_sub_days(offset) {
                Some(target) => {
                    out.anchor_date = target;
                    previous_observation(series, reference.date, target, ceiling)
                }
                None => Err(out_of_range(reference.date, anchor)),
            },
        };

        let prior = match resolved {
            Ok(prior) => prior,
            Err(e) => {
                tracing::debug!(symbol = %instrument.symbol, anchor = %anchor.name, "Anchor unavailable: {}", e);
                return out;
            }
        };
        out.observed_on = Some(prior.date);
        out.anchor_value = Some(prior.value);

        match delta(reference.value, prior, instrument.unit) {
            Ok(change) => out.delta = Some(change),
            Err(e) => {
                tracing::debug!(symbol = %instrument.symbol, anchor = %anchor.name, "Delta unavailable: {}", e)
            }
        }
        out
    }
}

fn out_of_range(from: NaiveDate, anchor: &AnchorSpec) -> AnalyticsError {
    AnalyticsError::Calculation(format!(
        "anchor '{}' reaches {} days before {}, outside the calendar",
        anchor.name, anchor.offset_days, from
    ))
}

/// The observation right before the current one.
///
/// Staleness is measured from `target` (the current observation's date minus
/// the anchor offset), so a Friday close still serves as the prior day for a
/// Monday close.
fn previous_observation(
    series: &TimeSeries,
    current: NaiveDate,
    target: NaiveDate,
    max_lookback_days: u32,
) -> Result<AsOf, AnalyticsError> {
    let missing = AnalyticsError::MissingData {
        target,
        max_lookback_days,
    };

    let (date, value) = series.latest_before(current).ok_or_else(|| missing.clone())?;
    if staleness_days(target, date) > i64::from(max_lookback_days) {
        return Err(missing);
    }
    Ok(AsOf { date, value })
}

/// The change from `prior` to `current` in the instrument's unit.
///
/// Basis-point instruments report the absolute difference; percent
/// instruments report the relative change scaled to 100.
pub fn delta(current: Decimal, prior: AsOf, unit: UnitMode) -> Result<Decimal, AnalyticsError> {
    let overflow = || AnalyticsError::Calculation(format!("overflow comparing {current} with {}", prior.value));
    let diff = current.checked_sub(prior.value).ok_or_else(overflow)?;

    match unit {
        UnitMode::BasisPoints => Ok(diff),
        UnitMode::Percent => {
            if prior.value.is_zero() {
                return Err(AnalyticsError::DegenerateAnchor { date: prior.date });
            }
            diff.checked_div(prior.value)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(overflow)
        }
    }
}
