use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::TimeSeries;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value together with the date it was actually observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsOf {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Returns the most recent value at or before `target`, or `None` when the
/// series is empty or the nearest value is more than `max_lookback_days` old.
pub fn resolve(series: &TimeSeries, target: NaiveDate, max_lookback_days: u32) -> Option<Decimal> {
    resolve_as_of(series, target, max_lookback_days)
        .ok()
        .map(|as_of| as_of.value)
}

/// Like [`resolve`], but keeps the observation date and reports why a lookup failed.
pub fn resolve_as_of(
    series: &TimeSeries,
    target: NaiveDate,
    max_lookback_days: u32,
) -> Result<AsOf, AnalyticsError> {
    let missing = AnalyticsError::MissingData {
        target,
        max_lookback_days,
    };

    let (date, value) = series.latest_on_or_before(target).ok_or_else(|| missing.clone())?;
    if staleness_days(target, date) > i64::from(max_lookback_days) {
        return Err(missing);
    }
    Ok(AsOf { date, value })
}

/// Calendar days between an observation and the date it stands in for.
pub(crate) fn staleness_days(target: NaiveDate, observed: NaiveDate) -> i64 {
    (target - observed).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekly() -> TimeSeries {
        [
            (d("2024-06-03"), dec!(10)),
            (d("2024-06-10"), dec!(11)),
            (d("2024-06-17"), dec!(12)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn exact_date_resolves_with_zero_lookback() {
        assert_eq!(resolve(&weekly(), d("2024-06-10"), 0), Some(dec!(11)));
    }

    #[test]
    fn gap_within_ceiling_uses_last_known_value() {
        let as_of = resolve_as_of(&weekly(), d("2024-06-13"), 3).unwrap();
        assert_eq!(as_of, AsOf { date: d("2024-06-10"), value: dec!(11) });
    }

    #[test]
    fn gap_beyond_ceiling_is_unavailable() {
        assert_eq!(resolve(&weekly(), d("2024-06-14"), 3), None);
        assert_eq!(
            resolve_as_of(&weekly(), d("2024-06-14"), 3),
            Err(AnalyticsError::MissingData { target: d("2024-06-14"), max_lookback_days: 3 })
        );
    }

    #[test]
    fn target_before_first_entry_is_unavailable() {
        assert_eq!(resolve(&weekly(), d("2024-06-02"), 30), None);
    }

    #[test]
    fn empty_series_is_unavailable() {
        assert_eq!(resolve(&TimeSeries::new(), d("2024-06-02"), 365), None);
    }

    proptest! {
        #[test]
        fn resolves_to_the_entry_opening_the_interval(
            gaps in prop::collection::vec(1i64..10, 2..20),
            pick in any::<prop::sample::Index>(),
            offset in 0i64..10,
        ) {
            let start = d("2024-01-01");
            let mut dates = vec![start];
            for gap in &gaps {
                let next = *dates.last().unwrap() + Duration::days(*gap);
                dates.push(next);
            }
            let series: TimeSeries = dates
                .iter()
                .enumerate()
                .map(|(i, date)| (*date, Decimal::from(i as i64)))
                .collect();

            let i = pick.index(dates.len() - 1);
            let span = (dates[i + 1] - dates[i]).num_days();
            let target = dates[i] + Duration::days(offset % span);
            prop_assert_eq!(resolve(&series, target, 10), Some(Decimal::from(i as i64)));
        }

        #[test]
        fn staleness_ceiling_is_enforced(ceiling in 0u32..10, extra in 1i64..10) {
            let series: TimeSeries = [(d("2024-01-01"), dec!(1))].into_iter().collect();
            let target = d("2024-01-01") + Duration::days(i64::from(ceiling) + extra);
            prop_assert_eq!(resolve(&series, target, ceiling), None);
            let edge = d("2024-01-01") + Duration::days(i64::from(ceiling));
            prop_assert_eq!(resolve(&series, edge, ceiling), Some(dec!(1)));
        }
    }
}
