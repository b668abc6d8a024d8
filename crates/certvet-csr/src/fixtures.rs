//! Builders for synthetic certificate requests used by tests.
//!
//! Requests carry a placeholder signature; extraction never verifies it, so
//! arbitrary key sizes can be produced without generating real key pairs.

use std::str::FromStr;

use const_oid::{
    db::{rfc5912, rfc8410},
    ObjectIdentifier,
};
use der::{
    asn1::{BitString, UintRef},
    Any, Decode, Encode,
};
use pkcs8::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::{
    name::Name,
    request::{CertReq, CertReqInfo, Version},
};

use crate::{
    error::{CsrError, Result},
    key::EcCurve,
    resource::CertificateSigningRequest,
};

const F4: [u8; 3] = [0x01, 0x00, 0x01];

/// Modulus bytes whose bit length is exactly `bits`
pub fn modulus_of_bits(bits: usize) -> Vec<u8> {
    if bits == 0 {
        return vec![0];
    }
    let mut modulus = vec![0xa5u8; bits.div_ceil(8)];
    modulus[0] = 1 << ((bits - 1) % 8);
    if let Some(last) = modulus.last_mut() {
        *last |= 1;
    }
    modulus
}

/// PKCS#1 `RSAPublicKey` DER for the given components
pub fn rsa_key_der(modulus: &[u8], exponent: &[u8]) -> Vec<u8> {
    let key = rsa::pkcs1::RsaPublicKey {
        modulus: UintRef::new(modulus).expect("modulus"),
        public_exponent: UintRef::new(exponent).expect("exponent"),
    };
    key.to_der().expect("RSAPublicKey encoding")
}

/// SPKI for an RSA key with a modulus of `bits` bits
pub fn rsa_spki(bits: usize) -> SubjectPublicKeyInfoOwned {
    let key = rsa_key_der(&modulus_of_bits(bits), &F4);
    spki(rfc5912::RSA_ENCRYPTION, Some(Any::null()), &key)
}

/// SPKI for an EC key on `curve` with a dummy uncompressed point
pub fn ec_spki(curve: EcCurve) -> SubjectPublicKeyInfoOwned {
    let params = Any::from_der(&curve.oid().to_der().expect("curve oid")).expect("curve params");
    let mut point = vec![0x04];
    point.extend(std::iter::repeat(0x42).take(2 * curve.bits().div_ceil(8)));
    spki(rfc5912::ID_EC_PUBLIC_KEY, Some(params), &point)
}

pub fn ed25519_spki() -> SubjectPublicKeyInfoOwned {
    spki(rfc8410::ID_ED_25519, None, &[0x11; 32])
}

/// SPKI with an arbitrary algorithm OID and raw key bytes
pub fn spki(
    oid: ObjectIdentifier,
    parameters: Option<Any>,
    key: &[u8],
) -> SubjectPublicKeyInfoOwned {
    SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned { oid, parameters },
        subject_public_key: BitString::from_bytes(key).expect("bit string"),
    }
}

/// DER `CertificationRequest` for `spki` with subject `CN=<common_name>`
pub fn request_der(common_name: &str, spki: SubjectPublicKeyInfoOwned) -> Result<Vec<u8>> {
    let subject = Name::from_str(&format!("CN={}", common_name))
        .map_err(|e| CsrError::BuildError(format!("Invalid subject: {}", e)))?;

    let req = CertReq {
        info: CertReqInfo {
            version: Version::V1,
            subject,
            public_key: spki,
            attributes: Default::default(),
        },
        algorithm: AlgorithmIdentifierOwned {
            oid: rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
            parameters: Some(Any::null()),
        },
        signature: BitString::from_bytes(&[0u8; 64])
            .map_err(|e| CsrError::BuildError(format!("Failed to create signature: {}", e)))?,
    };

    req.to_der()
        .map_err(|e| CsrError::BuildError(format!("Failed to encode DER: {}", e)))
}

/// PEM `CERTIFICATE REQUEST` for `spki`
pub fn request_pem(common_name: &str, spki: SubjectPublicKeyInfoOwned) -> Result<String> {
    let der = request_der(common_name, spki)?;
    Ok(pem::encode(&pem::Pem::new("CERTIFICATE REQUEST", der)))
}

/// Resource object wrapping a PEM request for an RSA key of `bits` bits
pub fn rsa_resource(name: &str, bits: usize) -> CertificateSigningRequest {
    let pem = request_pem(&format!("{}.example.com", name), rsa_spki(bits)).expect("RSA request");
    CertificateSigningRequest::new(name, pem.into_bytes())
}

/// Resource object wrapping a PEM request for an EC key
pub fn ec_resource(name: &str, curve: EcCurve) -> CertificateSigningRequest {
    let pem = request_pem(&format!("{}.example.com", name), ec_spki(curve)).expect("EC request");
    CertificateSigningRequest::new(name, pem.into_bytes())
}
