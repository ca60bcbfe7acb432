//! # Snapshot Analytics
//!
//! Turns raw provider series into point-in-time performance figures.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data
//!   providers, files or rendering. It depends only on `core-types` (Layer 0).
//! - **Explicit Reference Date:** Nothing here reads the clock. Every
//!   calculation takes the report's reference date as a parameter.
//! - **Contained Failures:** Missing data is a normal outcome and shows up as
//!   `None` in the result, never as an error that aborts a batch.
//!
//! ## Public API
//!
//! - `normalize` / `normalize_text`: raw observations to one value per date.
//! - `resolve` / `resolve_as_of`: the as-of lookup with a staleness ceiling.
//! - `PerformanceEngine`: per-anchor deltas for one instrument or a batch.
//! - `PerformanceResult`: the standardized output consumed downstream.

pub mod engine;
pub mod error;
pub mod normalizer;
pub mod report;
pub mod resolver;

pub use engine::{delta, LookbackPolicy, PerformanceEngine};
pub use error::AnalyticsError;
pub use normalizer::{normalize, normalize_text};
pub use report::{AnchorDelta, PerformanceResult};
pub use resolver::{resolve, resolve_as_of, AsOf};
