use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use core_types::{RawObservation, TimeSeries};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Collapses raw observations to one value per calendar date.
///
/// Observations are ordered by timestamp first (stable, so equal timestamps
/// keep input order) and the chronologically last value of each date wins.
pub fn normalize(raw: &[RawObservation]) -> TimeSeries {
    let mut ordered: Vec<&RawObservation> = raw.iter().collect();
    ordered.sort_by_key(|obs| obs.timestamp);
    ordered
        .into_iter()
        .map(|obs| (obs.timestamp.date(), obs.value))
        .collect()
}

/// Normalizes provider text rows of `(timestamp, value)`.
///
/// Rows whose timestamp or value does not parse are dropped; FRED, for
/// instance, reports missing observations as ".". An input with no usable
/// rows produces an empty series.
pub fn normalize_text<S: AsRef<str>>(rows: &[(S, S)]) -> TimeSeries {
    let parsed: Vec<RawObservation> = rows
        .iter()
        .filter_map(|(ts, value)| {
            let timestamp = parse_timestamp(ts.as_ref())?;
            let value = parse_value(value.as_ref())?;
            Some(RawObservation::new(timestamp, value))
        })
        .collect();

    let dropped = rows.len() - parsed.len();
    if dropped > 0 {
        tracing::debug!(dropped, total = rows.len(), "Dropped unparsable observations.");
    }

    normalize(&parsed)
}

/// Parses a date, a naive date-time or an RFC 3339 timestamp.
///
/// Offsets are discarded after conversion to the provider's local wall time,
/// so the calendar date is the one the provider reported.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

pub fn parse_value(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn same_day_entries_keep_the_latest_timestamp() {
        let raw = vec![
            RawObservation::new(at("2024-05-02", "16:00:00"), dec!(12)),
            RawObservation::new(at("2024-05-02", "09:30:00"), dec!(10)),
            RawObservation::new(at("2024-05-01", "16:00:00"), dec!(9)),
        ];
        let series = normalize(&raw);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d("2024-05-02")), Some(dec!(12)));
        assert_eq!(series.first(), Some((d("2024-05-01"), dec!(9))));
    }

    #[test]
    fn identical_timestamps_keep_input_order() {
        let raw = vec![
            RawObservation::new(at("2024-05-02", "16:00:00"), dec!(1)),
            RawObservation::new(at("2024-05-02", "16:00:00"), dec!(2)),
        ];
        assert_eq!(normalize(&raw).get(d("2024-05-02")), Some(dec!(2)));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn text_rows_drop_placeholders() {
        let rows = vec![
            ("2024-05-01", "4.25"),
            ("2024-05-02", "."),
            ("not a date", "4.40"),
            ("2024-05-03T00:00:00Z", "4.50"),
        ];
        let series = normalize_text(&rows);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d("2024-05-03")), Some(dec!(4.50)));
        assert_eq!(series.get(d("2024-05-02")), None);
    }

    #[test]
    fn entirely_unparsable_text_is_empty() {
        let rows = vec![("?", "."), ("", "")];
        assert!(normalize_text(&rows).is_empty());
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        assert_eq!(parse_timestamp("2024-05-03").map(|t| t.date()), Some(d("2024-05-03")));
        assert_eq!(parse_timestamp("2024-05-03 15:59:59").map(|t| t.date()), Some(d("2024-05-03")));
        assert_eq!(parse_timestamp("2024-05-03T15:59:59.250").map(|t| t.date()), Some(d("2024-05-03")));
        assert_eq!(
            parse_timestamp("2024-05-03T23:30:00-04:00").map(|t| t.date()),
            Some(d("2024-05-03"))
        );
    }

    #[test]
    fn parses_scientific_values() {
        assert_eq!(parse_value("1.5e2"), Some(dec!(150)));
        assert_eq!(parse_value(" 42 "), Some(dec!(42)));
        assert_eq!(parse_value("N/A"), None);
    }

    fn raw_strategy() -> impl Strategy<Value = Vec<RawObservation>> {
        prop::collection::vec((0i64..120, 0u32..86_400, -10_000i64..10_000), 0..60).prop_map(|rows| {
            rows.into_iter()
                .map(|(day, secs, cents)| {
                    let date = d("2024-01-01") + chrono::Duration::days(day);
                    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
                    RawObservation::new(date.and_time(time), Decimal::new(cents, 2))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn normalizing_is_idempotent(raw in raw_strategy()) {
            let once = normalize(&raw);
            let again: Vec<RawObservation> = once
                .iter()
                .map(|(date, value)| RawObservation::new(date.and_time(NaiveTime::MIN), value))
                .collect();
            prop_assert_eq!(normalize(&again), once);
        }

        #[test]
        fn normalized_dates_are_strictly_increasing(raw in raw_strategy()) {
            let series = normalize(&raw);
            let dates: Vec<NaiveDate> = series.iter().map(|(date, _)| date).collect();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            let distinct: std::collections::HashSet<_> = raw.iter().map(|o| o.timestamp.date()).collect();
            prop_assert_eq!(series.len(), distinct.len());
        }
    }
}
