use crate::snapshot::{AnchorRanking, ChartSeries, SectionReport, SnapshotReport};
use analyzer::{RankedSet, ScaleClass, ScaleLevel};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::UnitMode;
use rust_decimal::Decimal;
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

/// Renders the whole report as terminal tables.
pub fn render_report(report: &SnapshotReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily Financial Market Snapshot");
    let _ = writeln!(
        out,
        "Reference date: {}   Generated: {}",
        report.reference_date,
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    for (i, section) in report.sections.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", roman(i + 1), section.title);
        let _ = writeln!(out, "{}", section_table(section, &report.anchors));

        for ranking in &section.rankings {
            let _ = writeln!(out, "{}", ranking_table(ranking));
        }
        for chart in &section.charts {
            let _ = writeln!(out, "{}", chart_line(chart));
        }
    }
    out
}

fn section_table(section: &SectionReport, anchors: &[String]) -> Table {
    let mut table = new_table();
    let mut header = vec!["Asset".to_string(), "Symbol".to_string(), "Current Level".to_string()];
    header.extend(anchors.iter().map(|a| format!("Past {} Change", capitalize(a))));
    table.set_header(header);

    for row in &section.rows {
        let result = &row.result;
        let mut cells = vec![
            Cell::new(&result.label),
            Cell::new(&result.symbol),
            Cell::new(
                result
                    .reference_value
                    .map(|v| format!("{:.2}", v.round_dp(2)))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            )
            .set_alignment(CellAlignment::Right),
        ];
        for (delta, scale) in result.deltas.iter().zip(&row.scale) {
            cells.push(delta_cell(delta.delta, result.unit, *scale));
        }
        table.add_row(cells);
    }
    table
}

fn ranking_table(ranking: &AnchorRanking) -> Table {
    let mut table = new_table();
    let name = capitalize(&ranking.anchor);
    table.set_header(vec![
        format!("Past {} Top {}", name, ranking.top.len()),
        String::new(),
        format!("Past {} Bottom {}", name, ranking.bottom.len()),
        String::new(),
    ]);

    let rows = ranking.top.len().max(ranking.bottom.len());
    for i in 0..rows {
        let mut cells = ranked_cells(&ranking.top, i);
        cells.extend(ranked_cells(&ranking.bottom, i));
        table.add_row(cells);
    }
    table
}

fn ranked_cells(set: &RankedSet, i: usize) -> Vec<Cell> {
    match set.entries.get(i) {
        Some(entry) => vec![
            Cell::new(format!("{}. {}", entry.position, entry.label)),
            Cell::new(format_delta(Some(entry.delta), entry.unit)).set_alignment(CellAlignment::Right),
        ],
        None => vec![Cell::new(""), Cell::new("")],
    }
}

fn chart_line(chart: &ChartSeries) -> String {
    match &chart.summary {
        Some(s) => format!(
            "{}: {} -> {}, low {:.2}, high {:.2}, change {}",
            chart.title,
            s.start,
            s.end,
            s.low.round_dp(2),
            s.high.round_dp(2),
            s.change_pct
                .map(|c| format!("{}%", signed(c, 2)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        None => format!(
            "{}: not enough data for a chart (found {} points).",
            chart.title,
            chart.points.len()
        ),
    }
}

/// Formats a delta in its unit. Yield changes are shown in basis points.
pub fn format_delta(delta: Option<Decimal>, unit: UnitMode) -> String {
    match (delta, unit) {
        (None, _) => NOT_AVAILABLE.to_string(),
        (Some(d), UnitMode::Percent) => format!("{}%", signed(d, 2)),
        (Some(d), UnitMode::BasisPoints) => format!("{} bps", signed(d * Decimal::ONE_HUNDRED, 1)),
    }
}

fn delta_cell(delta: Option<Decimal>, unit: UnitMode, scale: Option<ScaleClass>) -> Cell {
    let cell = Cell::new(format_delta(delta, unit)).set_alignment(CellAlignment::Right);
    match scale.map(|s| s.level) {
        Some(level) => cell.fg(level_color(level)),
        None => cell.fg(Color::DarkGrey),
    }
}

fn level_color(level: ScaleLevel) -> Color {
    match level {
        ScaleLevel::StronglyNegative => Color::Red,
        ScaleLevel::Negative => Color::DarkRed,
        ScaleLevel::SlightlyNegative => Color::Magenta,
        ScaleLevel::Neutral => Color::Grey,
        ScaleLevel::SlightlyPositive => Color::Cyan,
        ScaleLevel::Positive => Color::DarkGreen,
        ScaleLevel::StronglyPositive => Color::Green,
    }
}

fn signed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp(dp);
    let sign = if rounded > Decimal::ZERO { "+" } else { "" };
    format!("{sign}{:.*}", dp as usize, rounded)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
