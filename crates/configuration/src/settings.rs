use crate::error::ConfigError;
use analyzer::{ScaleClassifier, DEFAULT_TOP_K};
use core_types::{AnchorSpec, Instrument, UnitMode, MAX_OFFSET_DAYS};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportSettings,
    /// Lookbacks in display order. Defaults to day / week / month.
    #[serde(default = "AnchorSpec::defaults")]
    pub anchors: Vec<AnchorSpec>,
    #[serde(default)]
    pub scale: ScaleClassifier,
    pub asset_classes: Vec<AssetClassConfig>,
}

/// Run-wide parameters for a snapshot report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// How many leaders and laggards to list per anchor.
    pub top_k: usize,
    /// Maximum age, in days, of a value standing in for an anchor date.
    pub max_lookback_days: u32,
    /// Maximum age, in days, of the value used as the current level.
    pub reference_lookback_days: u32,
    /// Length of the trailing window kept for charting.
    pub chart_days: u32,
    /// Directory holding one JSON series file per instrument.
    pub data_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_lookback_days: 5,
            reference_lookback_days: 4,
            chart_days: 30,
            data_dir: PathBuf::from("data"),
        }
    }
}

/// One section of the report, e.g. "Global Equities".
#[derive(Debug, Clone, Deserialize)]
pub struct AssetClassConfig {
    pub id: String,
    pub title: String,
    /// Whether top/bottom tables are produced for this class.
    #[serde(default)]
    pub ranked: bool,
    /// Labels listed first, in this order. The rest follow alphabetically.
    #[serde(default)]
    pub pinned: Vec<String>,
    /// Keep the trailing window of the best performer over the last anchor.
    #[serde(default)]
    pub chart_top_performer: bool,
    /// Symbol whose trailing window is always kept for charting.
    #[serde(default)]
    pub benchmark: Option<String>,
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub label: String,
    /// "percent" or "basis_points"; checked by `Config::validate`.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Series file name relative to the data directory, if not `<symbol>.json`.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_unit() -> String {
    UnitMode::Percent.to_string()
}

impl InstrumentConfig {
    pub fn unit_mode(&self) -> Result<UnitMode, ConfigError> {
        self.unit.parse::<UnitMode>().map_err(|source| ConfigError::InvalidUnitMode {
            symbol: self.symbol.clone(),
            source,
        })
    }

    pub fn file_name(&self) -> String {
        self.file.clone().unwrap_or_else(|| format!("{}.json", self.symbol))
    }
}

impl AssetClassConfig {
    /// Pinned instruments first, in pinned order, then the rest by label.
    pub fn ordered(&self) -> Vec<&InstrumentConfig> {
        let mut ordered: Vec<&InstrumentConfig> = self
            .pinned
            .iter()
            .filter_map(|label| self.instruments.iter().find(|i| &i.label == label))
            .collect();

        let mut rest: Vec<&InstrumentConfig> = self
            .instruments
            .iter()
            .filter(|i| !self.pinned.contains(&i.label))
            .collect();
        rest.sort_by(|a, b| a.label.cmp(&b.label));

        ordered.extend(rest);
        ordered
    }

    /// The class's instruments as domain values, in report order.
    pub fn instruments(&self) -> Result<Vec<(Instrument, &InstrumentConfig)>, ConfigError> {
        self.ordered()
            .into_iter()
            .map(|cfg| {
                let instrument = Instrument::new(&cfg.symbol, &cfg.label, &self.id, cfg.unit_mode()?);
                Ok((instrument, cfg))
            })
            .collect()
    }
}

impl Config {
    /// Rejects configurations that cannot produce a meaningful report.
    ///
    /// Runs before any series is loaded, so a typo in a unit mode or a
    /// threshold never surfaces halfway through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_k == 0 {
            return Err(ConfigError::ValidationError("report.top_k must be at least 1".to_string()));
        }
        if self.report.chart_days > MAX_OFFSET_DAYS {
            return Err(ConfigError::ValidationError(format!(
                "report.chart_days must be at most {MAX_OFFSET_DAYS}"
            )));
        }

        if self.anchors.is_empty() {
            return Err(ConfigError::ValidationError("at least one anchor is required".to_string()));
        }
        let mut anchor_names = HashSet::new();
        for anchor in &self.anchors {
            anchor.validate()?;
            if !anchor_names.insert(anchor.name.as_str()) {
                return Err(ConfigError::ValidationError(format!("duplicate anchor '{}'", anchor.name)));
            }
        }

        ScaleClassifier::new(self.scale.percent, self.scale.basis_points)?;

        if self.asset_classes.is_empty() {
            return Err(ConfigError::ValidationError("no asset classes configured".to_string()));
        }

        let mut class_ids = HashSet::new();
        let mut symbols = HashSet::new();
        for class in &self.asset_classes {
            if !class_ids.insert(class.id.as_str()) {
                return Err(ConfigError::ValidationError(format!("duplicate asset class '{}'", class.id)));
            }
            let mut labels = HashSet::new();
            for instrument in &class.instruments {
                instrument.unit_mode()?;
                if !labels.insert(instrument.label.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "label '{}' is used more than once in '{}'",
                        instrument.label, class.id
                    )));
                }
                if !symbols.insert(instrument.symbol.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "symbol '{}' is listed more than once",
                        instrument.symbol
                    )));
                }
            }
            let mut pinned = HashSet::new();
            for label in &class.pinned {
                if !pinned.insert(label.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "label '{}' is pinned more than once in '{}'",
                        label, class.id
                    )));
                }
                if !class.instruments.iter().any(|i| &i.label == label) {
                    return Err(ConfigError::ValidationError(format!(
                        "pinned label '{}' is not an instrument of '{}'",
                        label, class.id
                    )));
                }
            }
            if let Some(benchmark) = &class.benchmark {
                if !class.instruments.iter().any(|i| &i.symbol == benchmark) {
                    return Err(ConfigError::ValidationError(format!(
                        "benchmark '{}' is not an instrument of '{}'",
                        benchmark, class.id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn anchor_names(&self) -> Vec<String> {
        self.anchors.iter().map(|a| a.name.clone()).collect()
    }
}
