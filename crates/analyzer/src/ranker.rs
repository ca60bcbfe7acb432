use crate::error::AnalyzerError;
use analytics::PerformanceResult;
use core_types::UnitMode;
use rust_decimal::Decimal;
use serde::Serialize;

/// Number of leaders and laggards shown per anchor unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// 1-based position within the set.
    pub position: usize,
    pub symbol: String,
    pub label: String,
    /// Unit of `delta`, so a ranked yield change is not read as a percentage.
    pub unit: UnitMode,
    pub delta: Decimal,
}

/// The best or worst performers for one anchor, at most `k` long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSet {
    pub anchor: String,
    pub direction: RankDirection,
    pub entries: Vec<RankedEntry>,
}

impl RankedSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }
}

/// Splits a complete batch into its top-`k` and bottom-`k` performers for `anchor`.
///
/// Instruments without a delta for the anchor are skipped. Both sorts are
/// stable, so ties keep the order in which instruments appear in `results`.
/// Fewer than `k` eligible instruments are returned as-is, never padded.
pub fn rank(results: &[PerformanceResult], anchor: &str, k: usize) -> (RankedSet, RankedSet) {
    let eligible: Vec<(&PerformanceResult, Decimal)> = results
        .iter()
        .filter_map(|r| r.delta(anchor).map(|delta| (r, delta)))
        .collect();

    let mut descending = eligible.clone();
    descending.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ascending = eligible;
    ascending.sort_by(|a, b| a.1.cmp(&b.1));

    (
        ranked_set(anchor, RankDirection::Top, descending, k),
        ranked_set(anchor, RankDirection::Bottom, ascending, k),
    )
}

fn ranked_set(
    anchor: &str,
    direction: RankDirection,
    ordered: Vec<(&PerformanceResult, Decimal)>,
    k: usize,
) -> RankedSet {
    let entries = ordered
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, (result, delta))| RankedEntry {
            position: i + 1,
            symbol: result.symbol.clone(),
            label: result.label.clone(),
            unit: result.unit,
            delta,
        })
        .collect();

    RankedSet {
        anchor: anchor.to_string(),
        direction,
        entries,
    }
}

/// Ranks batches against a fixed set of anchor names.
#[derive(Debug, Clone)]
pub struct Ranker {
    top_k: usize,
    anchors: Vec<String>,
}

impl Ranker {
    pub fn new(top_k: usize, anchors: Vec<String>) -> Self {
        Self { top_k, anchors }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn rank(
        &self,
        results: &[PerformanceResult],
        anchor: &str,
    ) -> Result<(RankedSet, RankedSet), AnalyzerError> {
        if !self.anchors.iter().any(|a| a == anchor) {
            return Err(AnalyzerError::UnknownAnchor(anchor.to_string()));
        }
        let (top, bottom) = rank(results, anchor, self.top_k);
        tracing::debug!(anchor, eligible = top.len(), "Ranked batch.");
        Ok((top, bottom))
    }

    /// Ranks every configured anchor in configuration order.
    pub fn rank_all(&self, results: &[PerformanceResult]) -> Vec<(RankedSet, RankedSet)> {
        self.anchors
            .iter()
            .map(|anchor| rank(results, anchor, self.top_k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnchorDelta;
    use chrono::NaiveDate;
    use core_types::UnitMode;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn result(symbol: &str, month: Option<Decimal>) -> PerformanceResult {
        PerformanceResult {
            symbol: symbol.to_string(),
            label: format!("{symbol} label"),
            unit: UnitMode::Percent,
            reference_date: date(),
            as_of: Some(date()),
            reference_value: Some(dec!(100)),
            deltas: vec![AnchorDelta {
                anchor: "month".to_string(),
                anchor_date: date(),
                observed_on: month.map(|_| date()),
                anchor_value: month.map(|_| dec!(90)),
                delta: month,
            }],
        }
    }

    #[test]
    fn orders_top_and_bottom_by_signed_delta() {
        let batch = vec![
            result("A", Some(dec!(5))),
            result("B", Some(dec!(-3))),
            result("C", Some(dec!(8))),
            result("D", Some(dec!(1))),
        ];
        let (top, bottom) = rank(&batch, "month", 2);
        assert_eq!(top.symbols(), vec!["C", "A"]);
        assert_eq!(bottom.symbols(), vec!["B", "D"]);
        assert_eq!(top.entries[0].delta, dec!(8));
        assert_eq!(bottom.entries[1].delta, dec!(1));
        assert_eq!(bottom.direction, RankDirection::Bottom);
        assert_eq!(top.entries[1].position, 2);
    }

    #[test]
    fn entries_carry_the_instrument_unit() {
        let mut yield_10y = result("DGS10", Some(dec!(0.25)));
        yield_10y.unit = UnitMode::BasisPoints;
        let (top, _) = rank(&[yield_10y, result("A", Some(dec!(1)))], "month", 2);
        assert_eq!(top.entries[0].unit, UnitMode::Percent);
        assert_eq!(top.entries[1].unit, UnitMode::BasisPoints);
    }

    #[test]
    fn under_filled_batch_is_not_padded() {
        let batch = vec![result("A", Some(dec!(2))), result("B", Some(dec!(1)))];
        let (top, bottom) = rank(&batch, "month", DEFAULT_TOP_K);
        assert_eq!(top.len(), 2);
        assert_eq!(bottom.len(), 2);
    }

    #[test]
    fn null_deltas_are_excluded() {
        let batch = vec![result("A", None), result("B", Some(dec!(-1))), result("C", None)];
        let (top, bottom) = rank(&batch, "month", 5);
        assert_eq!(top.symbols(), vec!["B"]);
        assert_eq!(bottom.symbols(), vec!["B"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let batch = vec![
            result("A", Some(dec!(2))),
            result("B", Some(dec!(2.00))),
            result("C", Some(dec!(2))),
        ];
        let (top, bottom) = rank(&batch, "month", 2);
        assert_eq!(top.symbols(), vec!["A", "B"]);
        assert_eq!(bottom.symbols(), vec!["A", "B"]);
    }

    #[test]
    fn unknown_anchor_yields_empty_sets() {
        let batch = vec![result("A", Some(dec!(2)))];
        let (top, bottom) = rank(&batch, "quarter", 5);
        assert!(top.is_empty() && bottom.is_empty());
    }

    #[test]
    fn ranker_rejects_unconfigured_anchor() {
        let ranker = Ranker::new(5, vec!["month".to_string()]);
        assert_eq!(
            ranker.rank(&[], "week"),
            Err(AnalyzerError::UnknownAnchor("week".to_string()))
        );
        assert!(ranker.rank(&[], "month").is_ok());
        assert_eq!(ranker.rank_all(&[]).len(), 1);
    }
}
