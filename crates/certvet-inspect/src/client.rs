use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use certvet_csr::CertificateSigningRequest;

use crate::error::{InspectError, Result};

/// Read access to the cluster's CSR resources.
///
/// Handed to every inspector so that checks can consult cluster state.
pub trait ClusterClient: Send + Sync {
    /// Look up a request by name
    fn get(&self, name: &str) -> Result<Option<CertificateSigningRequest>>;

    /// All known requests, sorted by name
    fn list(&self) -> Result<Vec<CertificateSigningRequest>>;
}

/// Type alias for the request map
type RequestStorage = Arc<RwLock<HashMap<String, CertificateSigningRequest>>>;

/// In-memory cluster client
#[derive(Clone, Default)]
pub struct MemoryClient {
    requests: RequestStorage,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a request
    pub fn insert(&self, request: CertificateSigningRequest) -> Result<()> {
        let mut requests = self
            .requests
            .write()
            .map_err(|_| InspectError::ClientError("Failed to acquire write lock".to_string()))?;

        requests.insert(request.name().to_string(), request);
        Ok(())
    }
}

impl ClusterClient for MemoryClient {
    fn get(&self, name: &str) -> Result<Option<CertificateSigningRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|_| InspectError::ClientError("Failed to acquire read lock".to_string()))?;

        Ok(requests.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<CertificateSigningRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|_| InspectError::ClientError("Failed to acquire read lock".to_string()))?;

        let mut all: Vec<_> = requests.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }
}
