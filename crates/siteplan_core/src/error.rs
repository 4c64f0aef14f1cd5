use thiserror::Error;

/// Caller-facing validation failures.
///
/// The generator itself never raises these: it degrades to an empty plan.
/// Callers run [`crate::SiteParameters::validate`] first and surface the
/// message to the user before generation is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Site area is required (got {0} acres)")]
    MissingArea(f64),

    #[error("Parcel width must be positive (got {0} ft)")]
    NonPositiveWidth(f64),

    #[error("Parcel depth must be positive (got {0} ft)")]
    NonPositiveDepth(f64),

    #[error("Target lot size must be positive (got {0} sq ft)")]
    NonPositiveLotSize(f64),

    #[error("Proposed units must be at least 1")]
    MissingProposedUnits,
}

#[derive(Error, Debug)]
pub enum SitePlanError {
    #[error("Invalid site parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SitePlanError {
    /// True when the error stems from user input rather than from the
    /// environment (files, encodings).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SitePlanError::InvalidParameters(_) | SitePlanError::UnsupportedSchema { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SitePlanError>;
