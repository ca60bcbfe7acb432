//! Shared domain types for the market snapshot workspace.
//!
//! Layer 0: no dependencies on other workspace crates.

pub mod enums;
pub mod error;
pub mod series;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AnchorBasis, UnitMode};
pub use error::CoreError;
pub use series::TimeSeries;
pub use structs::{AnchorSpec, Instrument, RawObservation, MAX_OFFSET_DAYS};
