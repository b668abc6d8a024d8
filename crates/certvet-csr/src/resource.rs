//! The CSR resource object handed to inspectors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsrError, Result};

/// Object metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: String,
}

/// Requested certificate and requester identity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateSigningRequestSpec {
    /// Encoded PKCS#10 request (PEM or DER)
    #[serde(with = "base64_bytes")]
    pub request: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usages: Vec<String>,
}

/// A pending certificate signing request as stored by the cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateSigningRequest {
    pub metadata: ObjectMeta,
    pub spec: CertificateSigningRequestSpec,
}

impl CertificateSigningRequest {
    pub fn new(name: impl Into<String>, request: Vec<u8>) -> Self {
        Self {
            metadata: ObjectMeta { name: name.into() },
            spec: CertificateSigningRequestSpec {
                request,
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Parse a JSON resource object
    pub fn from_json(json: &str) -> Result<Self> {
        let csr: Self = serde_json::from_str(json)?;
        Ok(csr)
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a resource from disk.
    ///
    /// A file holding a JSON object is read as a resource; anything else is
    /// taken as the encoded request itself and named after the file stem.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(CsrError::IoError)?;

        let trimmed = bytes.trim_ascii_start();
        if trimmed.first() == Some(&b'{') {
            let text = std::str::from_utf8(trimmed)
                .map_err(|e| CsrError::ResourceError(format!("Resource is not UTF-8: {}", e)))?;
            return Self::from_json(text);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Save the encoded request as a PEM file, converting DER if needed
    #[cfg(any(test, feature = "test-support"))]
    pub fn save_request_pem<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let request = &self.spec.request;
        let pem = if request.trim_ascii_start().starts_with(b"-----BEGIN") {
            request.clone()
        } else {
            pem::encode(&pem::Pem::new(crate::CERTIFICATE_REQUEST_TAG, request.clone())).into_bytes()
        };
        std::fs::write(path, pem).map_err(CsrError::IoError)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
