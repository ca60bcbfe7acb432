use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A daily series holding at most one value per calendar date.
///
/// Backed by an ordered map so that "latest value on or before a date" is a
/// range query rather than a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: BTreeMap<NaiveDate, Decimal>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any value already stored for `date`.
    pub fn insert(&mut self, date: NaiveDate, value: Decimal) -> Option<Decimal> {
        self.points.insert(date, value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<Decimal> {
        self.points.get(&date).copied()
    }

    pub fn first(&self) -> Option<(NaiveDate, Decimal)> {
        self.points.first_key_value().map(|(d, v)| (*d, *v))
    }

    pub fn last(&self) -> Option<(NaiveDate, Decimal)> {
        self.points.last_key_value().map(|(d, v)| (*d, *v))
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, Decimal)> + '_ {
        self.points.iter().map(|(d, v)| (*d, *v))
    }

    /// The latest entry dated on or before `date`.
    pub fn latest_on_or_before(&self, date: NaiveDate) -> Option<(NaiveDate, Decimal)> {
        self.points.range(..=date).next_back().map(|(d, v)| (*d, *v))
    }

    /// The latest entry dated strictly before `date`.
    pub fn latest_before(&self, date: NaiveDate) -> Option<(NaiveDate, Decimal)> {
        self.points.range(..date).next_back().map(|(d, v)| (*d, *v))
    }

    /// The entries within the `days` calendar days ending at `end` (inclusive).
    ///
    /// A window reaching before the earliest representable date is clamped to it.
    pub fn trailing(&self, end: NaiveDate, days: u32) -> TimeSeries {
        let start = end.checked_sub_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MIN);
        let points = self
            .points
            .range(start..=end)
            .map(|(d, v)| (*d, *v))
            .collect();
        TimeSeries { points }
    }
}

impl FromIterator<(NaiveDate, Decimal)> for TimeSeries {
    /// Later entries for the same date replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: I) -> Self {
        TimeSeries {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> TimeSeries {
        [
            (d("2024-03-01"), dec!(100)),
            (d("2024-03-04"), dec!(101)),
            (d("2024-03-05"), dec!(99.5)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn latest_on_or_before_uses_exact_match() {
        assert_eq!(sample().latest_on_or_before(d("2024-03-04")), Some((d("2024-03-04"), dec!(101))));
    }

    #[test]
    fn latest_on_or_before_falls_back_across_gap() {
        assert_eq!(sample().latest_on_or_before(d("2024-03-03")), Some((d("2024-03-01"), dec!(100))));
        assert_eq!(sample().latest_on_or_before(d("2024-02-29")), None);
    }

    #[test]
    fn latest_before_is_strict() {
        assert_eq!(sample().latest_before(d("2024-03-04")), Some((d("2024-03-01"), dec!(100))));
        assert_eq!(sample().latest_before(d("2024-03-01")), None);
    }

    #[test]
    fn trailing_window_is_inclusive() {
        let window = sample().trailing(d("2024-03-05"), 1);
        assert_eq!(window.len(), 2);
        assert_eq!(window.first(), Some((d("2024-03-04"), dec!(101))));
    }

    #[test]
    fn oversized_trailing_window_keeps_everything() {
        assert_eq!(sample().trailing(d("2024-03-05"), u32::MAX), sample());
        assert!(sample().trailing(NaiveDate::MIN, 10).is_empty());
    }

    #[test]
    fn collecting_duplicate_dates_keeps_last() {
        let series: TimeSeries = [(d("2024-03-01"), dec!(1)), (d("2024-03-01"), dec!(2))]
            .into_iter()
            .collect();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(d("2024-03-01")), Some(dec!(2)));
    }
}
