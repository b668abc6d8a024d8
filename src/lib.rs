//! # Certvet - CSR key policy inspection
//!
//! Admission checks for pending certificate signing requests.
//!
//! ## Crates
//!
//! - `certvet_csr` - PKCS#10 decoding and the CSR resource object
//! - `certvet_inspect` - inspector contract, registry and built-in inspectors
//! - `certvet-cli` - command line front end (binary `certvet`)

// Re-export all library crates
pub use certvet_csr;
pub use certvet_inspect;
