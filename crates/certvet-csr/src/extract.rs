//! Certificate Signing Request (CSR) extraction
//!
//! Turns the raw bytes of a pending request into a [`CertificateRequest`].
//! Requests that cannot be decoded are not errors: they yield a diagnostic
//! string that callers report back to the requester as the rejection reason.

use const_oid::ObjectIdentifier;
use der::{Decode, Encode};
use tracing::debug;
use x509_cert::request::CertReq;

use crate::{
    error::{CsrError, Result},
    key::{decode_spki, KeyAlgorithm, PublicKey},
    CERTIFICATE_REQUEST_TAG, NEW_CERTIFICATE_REQUEST_TAG,
};

/// Diagnostic for PEM input that is not a certificate request
pub const PEM_TYPE_MESSAGE: &str = "PEM block type must be CERTIFICATE REQUEST";

/// Diagnostic for an empty request
pub const EMPTY_REQUEST_MESSAGE: &str = "certificate request is empty";

/// Decoded certificate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Subject distinguished name in RFC 4514 form
    pub subject: String,
    /// Algorithm declared by the subject public key info
    pub public_key_algorithm: KeyAlgorithm,
    /// Decoded subject public key
    pub public_key: PublicKey,
    /// Signature algorithm of the request
    pub signature_algorithm: ObjectIdentifier,
    /// DER encoding of the full request
    pub raw: Vec<u8>,
}

/// Outcome of decoding a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The request decoded cleanly
    Request(CertificateRequest),
    /// The request is malformed; the string explains why
    Rejected(String),
}

impl Extraction {
    fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        debug!(%message, "certificate request rejected during extraction");
        Self::Rejected(message)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Extraction {
    pub fn request(&self) -> Option<&CertificateRequest> {
        match self {
            Self::Request(req) => Some(req),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Request(_) => None,
            Self::Rejected(message) => Some(message),
        }
    }
}

const PEM_BEGIN: &[u8] = b"-----BEGIN";

/// Decode a PEM or DER encoded request.
///
/// Input containing a `-----BEGIN` line is PEM; text before the first block
/// (such as `openssl req -text` output) is skipped. Anything else is DER.
///
/// Malformed input comes back as [`Extraction::Rejected`]. The only `Err`
/// path is re-encoding an already decoded request into
/// [`CertificateRequest::raw`].
pub fn extract(raw: &[u8]) -> Result<Extraction> {
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() {
        return Ok(Extraction::rejected(EMPTY_REQUEST_MESSAGE));
    }

    if let Some(start) = trimmed
        .windows(PEM_BEGIN.len())
        .position(|window| window == PEM_BEGIN)
    {
        let block = match pem::parse(&trimmed[start..]) {
            Ok(block) => block,
            Err(_) => return Ok(Extraction::rejected(PEM_TYPE_MESSAGE)),
        };
        if block.tag() != CERTIFICATE_REQUEST_TAG && block.tag() != NEW_CERTIFICATE_REQUEST_TAG {
            return Ok(Extraction::rejected(PEM_TYPE_MESSAGE));
        }
        return extract_der(block.contents());
    }

    extract_der(raw)
}

/// Decode a DER encoded request
pub fn extract_der(der: &[u8]) -> Result<Extraction> {
    let req = match CertReq::from_der(der) {
        Ok(req) => req,
        Err(e) => {
            return Ok(Extraction::rejected(format!(
                "failed to parse certificate request: {}",
                e
            )))
        }
    };

    let (public_key_algorithm, public_key) = match decode_spki(&req.info.public_key) {
        Ok(decoded) => decoded,
        Err(message) => return Ok(Extraction::rejected(message)),
    };

    let raw = req
        .to_der()
        .map_err(|e| CsrError::EncodingError(format!("Failed to re-encode request: {}", e)))?;

    Ok(Extraction::Request(CertificateRequest {
        subject: req.info.subject.to_string(),
        public_key_algorithm,
        public_key,
        signature_algorithm: req.algorithm.oid,
        raw,
    }))
}
