use analyzer::AnalyzerError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Instrument '{symbol}': {source}")]
    InvalidUnitMode {
        symbol: String,
        #[source]
        source: CoreError,
    },

    #[error("Invalid anchor configuration: {0}")]
    Anchor(#[from] CoreError),

    #[error("Invalid scale configuration: {0}")]
    Scale(#[from] AnalyzerError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
