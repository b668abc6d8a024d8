use thiserror::Error;

/// Errors raised by the CSR decoding layer itself.
///
/// A malformed request is not an error: it is reported as
/// [`Extraction::Rejected`](crate::Extraction::Rejected). These variants cover
/// failures of the decoder or of the surrounding I/O.
#[derive(Error, Debug)]
pub enum CsrError {
    /// DER re-encoding of an already decoded structure failed
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Building a request failed
    #[error("Build error: {0}")]
    BuildError(String),

    /// Resource object could not be parsed
    #[error("Resource error: {0}")]
    ResourceError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CsrError>;
