//! The contract every CSR inspector implements.

use std::{fmt, sync::Arc};

use certvet_csr::CertificateSigningRequest;

use crate::{client::ClusterClient, error::Result};

/// Outcome of a successful inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No objection
    Pass,
    /// The request is refused; the message is shown to the requester
    Reject(String),
}

impl Verdict {
    /// Build a verdict from a message, where an empty message means pass
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Pass
        } else {
            Self::Reject(message)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject(_))
    }

    /// Rejection message, or the empty string for a pass
    pub fn message(&self) -> &str {
        match self {
            Self::Pass => "",
            Self::Reject(message) => message,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Reject(message) => write!(f, "reject: {}", message),
        }
    }
}

/// A pluggable policy check evaluated against pending CSRs.
///
/// Instances are immutable and shared across threads. Reconfiguration
/// produces a new instance; callers keep using the one returned by
/// [`Inspector::configure`].
pub trait Inspector: Send + Sync + fmt::Debug {
    /// Name the inspector is registered under
    fn name(&self) -> &'static str;

    /// Apply a configuration string.
    ///
    /// An empty string keeps the receiver. Anything else either yields a new
    /// instance or fails with [`InspectError::MalformedConfig`](crate::InspectError::MalformedConfig).
    fn configure(self: Arc<Self>, config: &str) -> Result<Arc<dyn Inspector>>;

    /// Evaluate one request
    fn inspect(
        &self,
        client: &dyn ClusterClient,
        request: &CertificateSigningRequest,
    ) -> Result<Verdict>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_message() {
        assert_eq!(Verdict::from_message(""), Verdict::Pass);
        assert_eq!(
            Verdict::from_message("bad key"),
            Verdict::Reject("bad key".to_string())
        );
    }

    #[test]
    fn test_verdict_accessors() {
        let pass = Verdict::Pass;
        assert!(pass.is_pass());
        assert!(!pass.is_reject());
        assert_eq!(pass.message(), "");
        assert_eq!(pass.to_string(), "pass");

        let reject = Verdict::Reject("too small".to_string());
        assert!(reject.is_reject());
        assert_eq!(reject.message(), "too small");
        assert_eq!(reject.to_string(), "reject: too small");
    }
}
