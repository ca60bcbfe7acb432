use analytics::{delta, AsOf, LookbackPolicy, PerformanceEngine, PerformanceResult};
use analyzer::{rank, RankedSet, Ranker, ScaleClass, ScaleClassifier};
use chrono::{NaiveDate, NaiveDateTime};
use configuration::{AssetClassConfig, Config, ConfigError};
use core_types::{Instrument, TimeSeries, UnitMode};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Everything the renderers need for one run.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub run_id: Uuid,
    pub generated_at: NaiveDateTime,
    pub reference_date: NaiveDate,
    pub anchors: Vec<String>,
    pub sections: Vec<SectionReport>,
}

/// One asset class: its table, its rankings and any retained chart series.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub id: String,
    pub title: String,
    pub rows: Vec<ReportRow>,
    pub rankings: Vec<AnchorRanking>,
    pub charts: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub result: PerformanceResult,
    /// Heatmap bucket per anchor, aligned with `result.deltas`.
    pub scale: Vec<Option<ScaleClass>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnchorRanking {
    pub anchor: String,
    pub top: RankedSet,
    pub bottom: RankedSet,
}

/// A trailing window kept for charting, with a short numeric summary.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub symbol: String,
    pub points: TimeSeries,
    /// `None` when the window holds fewer than two observations.
    pub summary: Option<ChartSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub low: Decimal,
    pub high: Decimal,
    pub change_pct: Option<Decimal>,
}

/// Assembles the report from a complete batch of loaded series.
///
/// Symbols with no entry in `series` are treated as empty series.
pub fn build_snapshot(
    config: &Config,
    series: &HashMap<String, TimeSeries>,
    reference_date: NaiveDate,
    generated_at: NaiveDateTime,
) -> Result<SnapshotReport, ConfigError> {
    let engine = PerformanceEngine::new(
        config.anchors.clone(),
        LookbackPolicy {
            max_lookback_days: config.report.max_lookback_days,
            reference_lookback_days: config.report.reference_lookback_days,
        },
    );
    let ranker = Ranker::new(config.report.top_k, config.anchor_names());

    let sections = config
        .asset_classes
        .iter()
        .map(|class| {
            build_section(
                class,
                &engine,
                &ranker,
                &config.scale,
                series,
                reference_date,
                config.report.chart_days,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SnapshotReport {
        run_id: Uuid::new_v4(),
        generated_at,
        reference_date,
        anchors: config.anchor_names(),
        sections,
    })
}

fn build_section(
    class: &AssetClassConfig,
    engine: &PerformanceEngine,
    ranker: &Ranker,
    classifier: &ScaleClassifier,
    series: &HashMap<String, TimeSeries>,
    reference_date: NaiveDate,
    chart_days: u32,
) -> Result<SectionReport, ConfigError> {
    let empty = TimeSeries::new();
    let instruments: Vec<Instrument> = class
        .instruments()?
        .into_iter()
        .map(|(instrument, _)| instrument)
        .collect();
    let lookup = |symbol: &str| series.get(symbol).unwrap_or(&empty);

    let results = engine.compute_batch(
        instruments.iter().map(|i| (i, lookup(i.symbol.as_str()))),
        reference_date,
    );

    let rows = results
        .iter()
        .map(|result| ReportRow {
            scale: result
                .deltas
                .iter()
                .map(|d| classifier.classify_cell(d.delta, result.unit))
                .collect(),
            result: result.clone(),
        })
        .collect();

    let rankings = if class.ranked {
        ranker
            .rank_all(&results)
            .into_iter()
            .map(|(top, bottom)| AnchorRanking {
                anchor: top.anchor.clone(),
                top,
                bottom,
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut charts = Vec::new();
    if let Some(symbol) = &class.benchmark {
        if let Some(instrument) = instruments.iter().find(|i| &i.symbol == symbol) {
            charts.push(chart(instrument, lookup(symbol.as_str()), reference_date, chart_days));
        }
    }
    if class.chart_top_performer {
        if let Some(anchor) = engine.anchors().last() {
            let (leader, _) = rank(&results, &anchor.name, 1);
            match leader.entries.first() {
                Some(entry) => {
                    if let Some(instrument) = instruments.iter().find(|i| i.symbol == entry.symbol) {
                        charts.push(chart(instrument, lookup(entry.symbol.as_str()), reference_date, chart_days));
                    }
                }
                None => tracing::info!(class = %class.id, anchor = %anchor.name, "No performer to chart."),
            }
        }
    }

    Ok(SectionReport {
        id: class.id.clone(),
        title: class.title.clone(),
        rows,
        rankings,
        charts,
    })
}

fn chart(instrument: &Instrument, series: &TimeSeries, end: NaiveDate, days: u32) -> ChartSeries {
    let points = series.trailing(end, days);
    ChartSeries {
        title: format!("{} ({}) - {} Day Performance", instrument.label, instrument.symbol, days),
        symbol: instrument.symbol.clone(),
        summary: summarize(&points),
        points,
    }
}

/// Summarizes a chart window; needs at least two observations.
pub fn summarize(points: &TimeSeries) -> Option<ChartSummary> {
    if points.len() < 2 {
        return None;
    }
    let (start, first) = points.first()?;
    let (end, last) = points.last()?;
    let low = points.iter().map(|(_, v)| v).min()?;
    let high = points.iter().map(|(_, v)| v).max()?;
    let change_pct = delta(last, AsOf { date: start, value: first }, UnitMode::Percent).ok();

    Some(ChartSummary {
        start,
        end,
        low,
        high,
        change_pct,
    })
}
