//! Certvet CSR - certificate signing request decoding
//!
//! Decodes PKCS#10 requests (PEM or DER) into a [`CertificateRequest`] whose
//! public key is a tagged union over the supported algorithms, and defines
//! the [`CertificateSigningRequest`] resource object that inspectors receive.

pub mod error;
pub mod extract;
pub mod key;
pub mod resource;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

/// PEM label of a PKCS#10 request
pub const CERTIFICATE_REQUEST_TAG: &str = "CERTIFICATE REQUEST";

/// Legacy PEM label still emitted by some tooling
pub const NEW_CERTIFICATE_REQUEST_TAG: &str = "NEW CERTIFICATE REQUEST";

pub use error::{CsrError, Result};
pub use extract::{extract, extract_der, CertificateRequest, Extraction};
pub use key::{EcCurve, KeyAlgorithm, PublicKey, RsaPublicKey};
pub use resource::{CertificateSigningRequest, CertificateSigningRequestSpec, ObjectMeta};
