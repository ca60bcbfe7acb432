use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Anchor '{0}' is not configured for ranking")]
    UnknownAnchor(String),

    #[error("Invalid {unit} scale thresholds: {reason}")]
    InvalidThresholds { unit: String, reason: String },
}
