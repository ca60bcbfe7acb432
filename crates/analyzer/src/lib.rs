//! Batch-level views over computed performance: leader/laggard rankings and
//! the discrete heatmap scale used to encode each value.
//!
//! Both operate on already-complete batches of `PerformanceResult`s and are
//! pure functions of their inputs.

pub mod error;
pub mod ranker;
pub mod scale;

pub use error::AnalyzerError;
pub use ranker::{rank, RankDirection, RankedEntry, RankedSet, Ranker, DEFAULT_TOP_K};
pub use scale::{ScaleClass, ScaleClassifier, ScaleLevel, ScaleThresholds};
