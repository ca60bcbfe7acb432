use analytics::normalize_text;
use core_types::TimeSeries;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The two file shapes accepted on disk: a bare array of rows, or a FRED-style
/// object wrapping them in `observations`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeriesFile {
    Rows(Vec<Row>),
    Observations { observations: Vec<Row> },
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(alias = "timestamp")]
    date: String,
    /// A JSON number or a numeric string; anything else is dropped.
    #[serde(default)]
    value: Value,
}

/// One instrument to load: its symbol and the file holding its series.
#[derive(Debug, Clone)]
pub struct SeriesSource {
    pub symbol: String,
    pub path: PathBuf,
}

/// Parses a series file into a normalized daily series.
pub fn parse_series(bytes: &[u8]) -> Result<TimeSeries, serde_json::Error> {
    let rows = match serde_json::from_slice::<SeriesFile>(bytes)? {
        SeriesFile::Rows(rows) => rows,
        SeriesFile::Observations { observations } => observations,
    };

    let text: Vec<(String, String)> = rows
        .into_iter()
        .filter_map(|row| {
            let value = match row.value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s,
                _ => return None,
            };
            Some((row.date, value))
        })
        .collect();

    Ok(normalize_text(&text))
}

/// Reads one series file. Failures are logged and yield an empty series.
pub async fn load_series(path: &Path) -> TimeSeries {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Series file unavailable.");
            return TimeSeries::new();
        }
    };

    match parse_series(&bytes) {
        Ok(series) => {
            if series.is_empty() {
                tracing::warn!(path = %path.display(), "Series file contains no usable observations.");
            }
            series
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Series file is not valid JSON.");
            TimeSeries::new()
        }
    }
}

/// Loads every source concurrently and returns the full batch keyed by symbol.
///
/// The map is only returned once every load has finished, so downstream
/// ranking always sees a complete batch.
pub async fn load_all(sources: Vec<SeriesSource>, show_progress: bool) -> HashMap<String, TimeSeries> {
    let progress_bar = if show_progress {
        ProgressBar::new(sources.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }

    let tasks = sources.into_iter().map(|source| {
        let pb = progress_bar.clone();
        async move {
            let series = load_series(&source.path).await;
            pb.set_message(source.symbol.clone());
            pb.inc(1);
            (source.symbol, series)
        }
    });

    let loaded: HashMap<String, TimeSeries> = join_all(tasks).await.into_iter().collect();
    progress_bar.finish_and_clear();

    let empty = loaded.values().filter(|s| s.is_empty()).count();
    tracing::info!(instruments = loaded.len(), empty, "Series loaded.");
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_bare_rows_with_numbers() {
        let json = br#"[
            {"timestamp": "2024-06-03 09:30:00", "value": 530.1},
            {"timestamp": "2024-06-03 16:00:00", "value": 531.25},
            {"date": "2024-06-04", "value": 529}
        ]"#;
        let series = parse_series(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d("2024-06-03")), Some(dec!(531.25)));
    }

    #[test]
    fn parses_fred_observations() {
        let json = br#"{"observations": [
            {"date": "2024-06-03", "value": "4.41"},
            {"date": "2024-06-04", "value": "."},
            {"date": "2024-06-05", "value": null},
            {"date": "2024-06-06", "value": "4.29"}
        ]}"#;
        let series = parse_series(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last(), Some((d("2024-06-06"), dec!(4.29))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_series(b"{not json").is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_series(&dir.path().join("nope.json")).await.is_empty());
    }

    #[tokio::test]
    async fn loads_a_batch_keyed_by_symbol() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("SPY.json"), br#"[{"date": "2024-06-03", "value": 530}]"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), b"[").unwrap();

        let sources = vec![
            SeriesSource { symbol: "SPY".into(), path: dir.path().join("SPY.json") },
            SeriesSource { symbol: "QQQ".into(), path: dir.path().join("broken.json") },
        ];
        let batch = load_all(sources, false).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch["SPY"].len(), 1);
        assert!(batch["QQQ"].is_empty());
    }
}
