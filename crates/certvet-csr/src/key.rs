//! Decoded subject public keys.
//!
//! The algorithm tag of a request and the decoded key value are kept apart so
//! that consumers can detect a tag that does not match its value instead of
//! casting blindly.

use std::fmt;

use const_oid::{
    db::{rfc5912, rfc8410},
    ObjectIdentifier,
};
use der::{Decode, Encode, Tagged};
use pkcs8::spki::SubjectPublicKeyInfoOwned;
use serde::{Deserialize, Serialize};

/// Public key algorithm declared by a request's SPKI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Rsa,
    Dsa,
    Ecdsa,
    Ed25519,
    Unknown,
}

impl KeyAlgorithm {
    /// Map an SPKI algorithm OID to its tag
    pub fn from_oid(oid: &ObjectIdentifier) -> Self {
        if *oid == rfc5912::RSA_ENCRYPTION {
            Self::Rsa
        } else if *oid == rfc5912::ID_DSA {
            Self::Dsa
        } else if *oid == rfc5912::ID_EC_PUBLIC_KEY {
            Self::Ecdsa
        } else if *oid == rfc8410::ID_ED_25519 {
            Self::Ed25519
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Dsa => "DSA",
            Self::Ecdsa => "ECDSA",
            Self::Ed25519 => "Ed25519",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// secp224r1 (NIST P-224)
const SECP_224_R_1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.33");

/// Named elliptic curves accepted for `id-ecPublicKey`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    P224,
    P256,
    P384,
    P521,
}

impl EcCurve {
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        if *oid == SECP_224_R_1 {
            Some(Self::P224)
        } else if *oid == rfc5912::SECP_256_R_1 {
            Some(Self::P256)
        } else if *oid == rfc5912::SECP_384_R_1 {
            Some(Self::P384)
        } else if *oid == rfc5912::SECP_521_R_1 {
            Some(Self::P521)
        } else {
            None
        }
    }

    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::P224 => SECP_224_R_1,
            Self::P256 => rfc5912::SECP_256_R_1,
            Self::P384 => rfc5912::SECP_384_R_1,
            Self::P521 => rfc5912::SECP_521_R_1,
        }
    }

    /// Field size in bits
    pub fn bits(&self) -> usize {
        match self {
            Self::P224 => 224,
            Self::P256 => 256,
            Self::P384 => 384,
            Self::P521 => 521,
        }
    }

    fn coordinate_len(&self) -> usize {
        self.bits().div_ceil(8)
    }
}

/// RSA public key components, big-endian with leading zeros stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    modulus: Vec<u8>,
    exponent: Vec<u8>,
}

impl RsaPublicKey {
    pub fn new(modulus: &[u8], exponent: &[u8]) -> Self {
        Self {
            modulus: strip_leading_zeros(modulus).to_vec(),
            exponent: strip_leading_zeros(exponent).to_vec(),
        }
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn exponent(&self) -> &[u8] {
        &self.exponent
    }

    /// Number of bits needed to represent the modulus; 0 for a zero modulus
    pub fn bit_len(&self) -> usize {
        match self.modulus.first() {
            None => 0,
            Some(&top) => (self.modulus.len() - 1) * 8 + (8 - top.leading_zeros() as usize),
        }
    }
}

/// Algorithm-specific public key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ec { curve: EcCurve, point: Vec<u8> },
    Ed25519([u8; 32]),
    /// Keys this crate does not interpret (DSA and unknown algorithms)
    Opaque { algorithm: ObjectIdentifier, key: Vec<u8> },
}

impl PublicKey {
    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "RSA",
            Self::Ec { .. } => "EC",
            Self::Ed25519(_) => "Ed25519",
            Self::Opaque { .. } => "opaque",
        }
    }

    /// Key size in bits where it is meaningful
    pub fn bits(&self) -> Option<usize> {
        match self {
            Self::Rsa(key) => Some(key.bit_len()),
            Self::Ec { curve, .. } => Some(curve.bits()),
            Self::Ed25519(_) => Some(256),
            Self::Opaque { .. } => None,
        }
    }

    pub fn as_rsa(&self) -> Option<&RsaPublicKey> {
        match self {
            Self::Rsa(key) => Some(key),
            _ => None,
        }
    }
}

/// Decode the key carried in an SPKI.
///
/// The outer `Err` is a diagnostic for a malformed key, phrased for the
/// requester.
pub(crate) fn decode_spki(
    spki: &SubjectPublicKeyInfoOwned,
) -> std::result::Result<(KeyAlgorithm, PublicKey), String> {
    let algorithm = KeyAlgorithm::from_oid(&spki.algorithm.oid);
    let key_bytes = spki.subject_public_key.raw_bytes();

    let key = match algorithm {
        KeyAlgorithm::Rsa => {
            if !has_null_parameters(spki) {
                return Err("malformed RSA public key: missing NULL parameters".to_string());
            }
            PublicKey::Rsa(decode_rsa(key_bytes)?)
        }
        KeyAlgorithm::Ecdsa => {
            let params = spki
                .algorithm
                .parameters
                .as_ref()
                .ok_or_else(|| "malformed EC public key: missing curve parameters".to_string())?;
            let params_der = params
                .to_der()
                .map_err(|e| format!("malformed EC public key: {}", e))?;
            let curve_oid = ObjectIdentifier::from_der(&params_der)
                .map_err(|_| "malformed EC public key: curve is not a named curve".to_string())?;
            let curve = EcCurve::from_oid(&curve_oid)
                .ok_or_else(|| format!("unsupported elliptic curve {}", curve_oid))?;
            check_ec_point(curve, key_bytes)?;
            PublicKey::Ec {
                curve,
                point: key_bytes.to_vec(),
            }
        }
        KeyAlgorithm::Ed25519 => {
            let key: [u8; 32] = key_bytes.try_into().map_err(|_| {
                format!("malformed Ed25519 public key: length {}", key_bytes.len())
            })?;
            PublicKey::Ed25519(key)
        }
        KeyAlgorithm::Dsa | KeyAlgorithm::Unknown => PublicKey::Opaque {
            algorithm: spki.algorithm.oid,
            key: key_bytes.to_vec(),
        },
    };

    Ok((algorithm, key))
}

fn has_null_parameters(spki: &SubjectPublicKeyInfoOwned) -> bool {
    spki.algorithm
        .parameters
        .as_ref()
        .is_some_and(|params| params.tag() == der::Tag::Null && params.value().is_empty())
}

fn decode_rsa(key_bytes: &[u8]) -> std::result::Result<RsaPublicKey, String> {
    let key = rsa::pkcs1::RsaPublicKey::from_der(key_bytes)
        .map_err(|e| format!("malformed RSA public key: {}", e))?;
    let parsed = RsaPublicKey::new(key.modulus.as_bytes(), key.public_exponent.as_bytes());
    if parsed.modulus().is_empty() {
        return Err("malformed RSA public key: modulus is not a positive number".to_string());
    }
    if parsed.exponent().is_empty() {
        return Err("malformed RSA public key: exponent is not a positive number".to_string());
    }
    Ok(parsed)
}

/// Only the uncompressed form is accepted
fn check_ec_point(curve: EcCurve, point: &[u8]) -> std::result::Result<(), String> {
    let well_formed =
        point.first() == Some(&0x04) && point.len() == 1 + 2 * curve.coordinate_len();
    if well_formed {
        Ok(())
    } else {
        Err("malformed EC public key: invalid point encoding".to_string())
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_len() {
        assert_eq!(RsaPublicKey::new(&[], &[1, 0, 1]).bit_len(), 0);
        assert_eq!(RsaPublicKey::new(&[0, 0], &[1, 0, 1]).bit_len(), 0);
        assert_eq!(RsaPublicKey::new(&[1], &[3]).bit_len(), 1);
        assert_eq!(RsaPublicKey::new(&[0x80], &[3]).bit_len(), 8);
        assert_eq!(RsaPublicKey::new(&[0x00, 0x01, 0xff], &[3]).bit_len(), 9);

        let mut modulus = vec![0xffu8; 256];
        assert_eq!(RsaPublicKey::new(&modulus, &[3]).bit_len(), 2048);
        modulus[0] = 0x7f;
        assert_eq!(RsaPublicKey::new(&modulus, &[3]).bit_len(), 2047);
    }

    #[test]
    fn test_algorithm_tags() {
        assert_eq!(KeyAlgorithm::from_oid(&rfc5912::RSA_ENCRYPTION), KeyAlgorithm::Rsa);
        assert_eq!(KeyAlgorithm::from_oid(&rfc5912::ID_EC_PUBLIC_KEY), KeyAlgorithm::Ecdsa);
        assert_eq!(KeyAlgorithm::from_oid(&rfc8410::ID_ED_25519), KeyAlgorithm::Ed25519);
        assert_eq!(KeyAlgorithm::from_oid(&rfc5912::ID_DSA), KeyAlgorithm::Dsa);
        assert_eq!(KeyAlgorithm::from_oid(&rfc8410::ID_X_25519), KeyAlgorithm::Unknown);
        assert_eq!(KeyAlgorithm::Rsa.to_string(), "RSA");
    }

    #[test]
    fn test_ec_point_shapes() {
        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&[7u8; 64]);
        assert!(check_ec_point(EcCurve::P256, &uncompressed).is_ok());
        assert!(check_ec_point(EcCurve::P384, &uncompressed).is_err());

        let mut p224 = vec![0x04];
        p224.extend_from_slice(&[7u8; 56]);
        assert!(check_ec_point(EcCurve::P224, &p224).is_ok());

        let mut compressed = vec![0x03];
        compressed.extend_from_slice(&[7u8; 66]);
        assert!(check_ec_point(EcCurve::P521, &compressed).is_err());

        assert!(check_ec_point(EcCurve::P256, &[]).is_err());
        assert!(check_ec_point(EcCurve::P256, &[0x05; 65]).is_err());
    }

    #[test]
    fn test_rsa_key_rejects_zero_modulus() {
        let der = crate::fixtures::rsa_key_der(&[0], &[1, 0, 1]);
        let err = decode_rsa(&der).unwrap_err();
        assert!(err.contains("modulus is not a positive number"));
    }
}
