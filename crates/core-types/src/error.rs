use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unsupported unit mode '{0}' (expected 'percent' or 'basis_points')")]
    InvalidUnitMode(String),

    #[error("Invalid anchor '{name}': {reason}")]
    InvalidAnchor { name: String, reason: String },
}
