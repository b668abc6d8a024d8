//! Certvet Inspect - pluggable CSR policy checks
//!
//! Provides the [`Inspector`] contract, an explicit [`Registry`] of named
//! inspectors, and the `minrsakeysize` inspector that enforces a minimum RSA
//! modulus size on pending requests.

pub mod client;
pub mod error;
pub mod inspector;
pub mod minrsakeysize;
pub mod registry;

pub use client::{ClusterClient, MemoryClient};
pub use error::{InspectError, Result};
pub use inspector::{Inspector, Verdict};
pub use minrsakeysize::MinRsaKeySize;
pub use registry::{builtin_factories, Factory, InspectorPolicy, Pipeline, Registry};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        client::{ClusterClient, MemoryClient},
        error::{InspectError, Result},
        inspector::{Inspector, Verdict},
        minrsakeysize::MinRsaKeySize,
        registry::{InspectorPolicy, Pipeline, Registry},
    };
}
