//! Minimum RSA key size inspector
//!
//! Passes requests whose public key is not RSA, and RSA requests whose
//! modulus is at least the configured number of bits. Restricting which
//! algorithms are acceptable at all is left to other inspectors.

use std::sync::Arc;

use certvet_csr::{extract, CertificateRequest, CertificateSigningRequest, Extraction, KeyAlgorithm};
use tracing::{debug, info};

use crate::{
    client::ClusterClient,
    error::{InspectError, Result},
    inspector::{Inspector, Verdict},
};

/// Registry key
pub const NAME: &str = "minrsakeysize";

/// Threshold used when no configuration is given
pub const DEFAULT_MIN_SIZE: usize = 3072;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinRsaKeySize {
    min_size: usize,
}

impl MinRsaKeySize {
    pub const fn new(min_size: usize) -> Self {
        Self { min_size }
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Parse a threshold: ASCII decimal digits only
    pub fn parse_min_size(config: &str) -> Result<usize> {
        if !config.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InspectError::malformed_config(
                NAME,
                config,
                "expected an unsigned decimal integer",
            ));
        }
        config
            .parse::<usize>()
            .map_err(|e| InspectError::malformed_config(NAME, config, e))
    }

    /// Apply the threshold to an already decoded request
    pub fn check_request(&self, request: &CertificateRequest) -> Result<Verdict> {
        if request.public_key_algorithm != KeyAlgorithm::Rsa {
            return Ok(Verdict::Pass);
        }

        let key = request.public_key.as_rsa().ok_or_else(|| {
            InspectError::Inconsistent(format!(
                "public key algorithm is RSA but the key value is {}",
                request.public_key.kind()
            ))
        })?;

        let bits = key.bit_len();
        if bits < self.min_size {
            return Ok(Verdict::Reject(format!(
                "Public key too small: {} < {}",
                bits, self.min_size
            )));
        }

        Ok(Verdict::Pass)
    }
}

impl Default for MinRsaKeySize {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SIZE)
    }
}

impl Inspector for MinRsaKeySize {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configure(self: Arc<Self>, config: &str) -> Result<Arc<dyn Inspector>> {
        if config.is_empty() {
            return Ok(self);
        }

        let min_size = Self::parse_min_size(config)?;
        info!(inspector = NAME, min_size, "configured minimum RSA key size");
        Ok(Arc::new(Self::new(min_size)))
    }

    fn inspect(
        &self,
        _client: &dyn ClusterClient,
        request: &CertificateSigningRequest,
    ) -> Result<Verdict> {
        let decoded = match extract(&request.spec.request)? {
            Extraction::Request(decoded) => decoded,
            Extraction::Rejected(message) => return Ok(Verdict::from_message(message)),
        };

        let verdict = self.check_request(&decoded)?;
        debug!(
            inspector = NAME,
            csr = request.name(),
            algorithm = %decoded.public_key_algorithm,
            %verdict,
            "inspected certificate request"
        );
        Ok(verdict)
    }
}

/// Factory for the registry table
pub fn factory() -> Arc<dyn Inspector> {
    Arc::new(MinRsaKeySize::default())
}

#[cfg(test)]
mod tests {
    use certvet_csr::{fixtures, EcCurve, PublicKey};

    use super::*;
    use crate::client::MemoryClient;

    fn inspect(inspector: &dyn Inspector, request: &CertificateSigningRequest) -> Verdict {
        inspector.inspect(&MemoryClient::new(), request).unwrap()
    }

    fn rsa_request(bits: usize) -> CertificateRequest {
        let der = fixtures::request_der("k.example.com", fixtures::rsa_spki(bits)).unwrap();
        match extract(&der).unwrap() {
            Extraction::Request(req) => req,
            Extraction::Rejected(message) => panic!("fixture rejected: {}", message),
        }
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(MinRsaKeySize::default().min_size(), 3072);
        assert_eq!(factory().name(), NAME);
    }

    #[test]
    fn test_threshold_comparison() {
        for (threshold, bits) in [(0, 1), (1024, 1023), (1024, 1024), (3072, 2048), (3072, 4096)] {
            let verdict = MinRsaKeySize::new(threshold)
                .check_request(&rsa_request(bits))
                .unwrap();
            if bits < threshold {
                assert_eq!(
                    verdict,
                    Verdict::Reject(format!("Public key too small: {} < {}", bits, threshold))
                );
            } else {
                assert_eq!(verdict, Verdict::Pass);
            }
        }
    }

    #[test]
    fn test_default_rejects_2048() {
        let inspector = MinRsaKeySize::default();
        let verdict = inspect(&inspector, &fixtures::rsa_resource("small", 2048));
        assert_eq!(verdict.message(), "Public key too small: 2048 < 3072");
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let inspector = MinRsaKeySize::new(2048);
        assert_eq!(inspect(&inspector, &fixtures::rsa_resource("edge", 2048)), Verdict::Pass);
        assert!(inspect(&inspector, &fixtures::rsa_resource("below", 2047)).is_reject());
    }

    #[test]
    fn test_non_rsa_keys_pass() {
        let inspector = MinRsaKeySize::new(usize::MAX);
        for curve in [EcCurve::P224, EcCurve::P256, EcCurve::P384, EcCurve::P521] {
            assert_eq!(inspect(&inspector, &fixtures::ec_resource("ec", curve)), Verdict::Pass);
        }

        let pem = fixtures::request_pem("ed.example.com", fixtures::ed25519_spki()).unwrap();
        let request = CertificateSigningRequest::new("ed", pem.into_bytes());
        assert_eq!(inspect(&inspector, &request), Verdict::Pass);
    }

    #[test]
    fn test_malformed_request_is_reported_as_verdict() {
        let inspector = MinRsaKeySize::default();
        let request = CertificateSigningRequest::new("garbage", b"definitely not a CSR".to_vec());
        let verdict = inspect(&inspector, &request);
        assert!(verdict.message().starts_with("failed to parse certificate request"));

        let empty = CertificateSigningRequest::new("empty", Vec::new());
        assert_eq!(
            inspect(&inspector, &empty),
            Verdict::Reject("certificate request is empty".to_string())
        );
    }

    #[test]
    fn test_inconsistent_request_is_an_error() {
        let mut request = rsa_request(4096);
        request.public_key = PublicKey::Ed25519([0; 32]);

        let err = MinRsaKeySize::default().check_request(&request).unwrap_err();
        assert!(matches!(err, InspectError::Inconsistent(ref m) if m.contains("Ed25519")));
    }

    #[test]
    fn test_configure_empty_keeps_instance() {
        let original = Arc::new(MinRsaKeySize::new(2048));
        let configured = original.clone().configure("").unwrap();

        assert!(std::ptr::eq(
            Arc::as_ptr(&configured) as *const (),
            Arc::as_ptr(&original) as *const ()
        ));
        assert_eq!(inspect(configured.as_ref(), &fixtures::rsa_resource("r", 2048)), Verdict::Pass);
    }

    #[test]
    fn test_configure_returns_new_instance() {
        let original = Arc::new(MinRsaKeySize::default());
        let configured = original.clone().configure("4096").unwrap();

        let request = fixtures::rsa_resource("r", 3072);
        assert_eq!(
            inspect(configured.as_ref(), &request).message(),
            "Public key too small: 3072 < 4096"
        );
        assert_eq!(original.min_size(), 3072);
        assert_eq!(inspect(original.as_ref(), &request), Verdict::Pass);
    }

    #[test]
    fn test_configure_replaces_rather_than_merges() {
        let strict = Arc::new(MinRsaKeySize::new(8192));
        let relaxed = strict.configure("1024").unwrap();
        assert_eq!(inspect(relaxed.as_ref(), &fixtures::rsa_resource("r", 2048)), Verdict::Pass);
    }

    #[test]
    fn test_configure_rejects_malformed_values() {
        for bad in ["abc", "-5", "+5", " 5", "5 ", "4096bits", "0x800", "99999999999999999999999"] {
            let err = Arc::new(MinRsaKeySize::default()).configure(bad).unwrap_err();
            match err {
                InspectError::MalformedConfig { inspector, value, .. } => {
                    assert_eq!(inspector, NAME);
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {:?}: {}", bad, other),
            }
        }
    }

    #[test]
    fn test_configure_accepts_zero_and_leading_zeros() {
        let zero = Arc::new(MinRsaKeySize::default()).configure("0").unwrap();
        assert_eq!(inspect(zero.as_ref(), &fixtures::rsa_resource("r", 1)), Verdict::Pass);

        assert_eq!(MinRsaKeySize::parse_min_size("02048").unwrap(), 2048);
    }

    #[test]
    fn test_inspect_is_idempotent() {
        let inspector = MinRsaKeySize::default();
        let request = fixtures::rsa_resource("repeat", 2048);
        let first = inspect(&inspector, &request);
        for _ in 0..5 {
            assert_eq!(inspect(&inspector, &request), first);
        }
    }

    #[test]
    fn test_concurrent_inspection() {
        let inspector: Arc<dyn Inspector> = Arc::new(MinRsaKeySize::default());
        let handles: Vec<_> = [1024usize, 2048, 3072, 4096]
            .into_iter()
            .map(|bits| {
                let inspector = Arc::clone(&inspector);
                std::thread::spawn(move || {
                    let request = fixtures::rsa_resource("threaded", bits);
                    (bits, inspect(inspector.as_ref(), &request))
                })
            })
            .collect();

        for handle in handles {
            let (bits, verdict) = handle.join().unwrap();
            assert_eq!(verdict.is_pass(), bits >= DEFAULT_MIN_SIZE);
        }
    }
}
