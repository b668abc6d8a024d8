use certvet_csr::CsrError;
use thiserror::Error;

/// Errors raised while configuring or running inspectors
#[derive(Error, Debug)]
pub enum InspectError {
    /// Configuration string rejected at setup time
    #[error("Malformed configuration for {inspector}: {value:?}: {reason}")]
    MalformedConfig {
        inspector: String,
        value: String,
        reason: String,
    },

    /// Decoded request breaks the extraction contract
    #[error("Inconsistent certificate request: {0}")]
    Inconsistent(String),

    /// Decoder failure, distinct from a malformed request
    #[error("Extraction error: {0}")]
    Extraction(#[from] CsrError),

    /// Policy names an inspector that is not registered
    #[error("Unknown inspector: {0}")]
    UnknownInspector(String),

    /// Inspector registered twice under one name
    #[error("Inspector already registered: {0}")]
    DuplicateInspector(String),

    /// Cluster client failure
    #[error("Cluster client error: {0}")]
    ClientError(String),
}

impl InspectError {
    pub fn malformed_config(
        inspector: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::MalformedConfig {
            inspector: inspector.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, InspectError>;
