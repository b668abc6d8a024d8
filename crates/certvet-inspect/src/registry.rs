//! Inspector registry and configured pipelines
//!
//! The registry is an explicit object: hosts build one, register the
//! inspectors they want available, and derive a [`Pipeline`] from a policy.

use std::{collections::BTreeMap, sync::Arc};

use certvet_csr::CertificateSigningRequest;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    client::ClusterClient,
    error::{InspectError, Result},
    inspector::{Inspector, Verdict},
    minrsakeysize,
};

/// Constructor for an inspector with its built-in defaults
pub type Factory = fn() -> Arc<dyn Inspector>;

const BUILTINS: &[(&str, Factory)] = &[(minrsakeysize::NAME, minrsakeysize::factory)];

/// Inspectors shipped with this crate
pub fn builtin_factories() -> &'static [(&'static str, Factory)] {
    BUILTINS
}

/// One policy entry: which inspector to run and how to configure it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectorPolicy {
    pub name: String,
    #[serde(default)]
    pub config: String,
}

impl InspectorPolicy {
    pub fn new(name: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: config.into(),
        }
    }
}

/// Named inspectors available to a host
#[derive(Debug, Default)]
pub struct Registry {
    inspectors: BTreeMap<String, Arc<dyn Inspector>>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in inspector at its default settings
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, factory) in builtin_factories() {
            registry.inspectors.insert((*name).to_string(), factory());
        }
        registry
    }

    /// Register an inspector under `name`
    pub fn register(&mut self, name: impl Into<String>, inspector: Arc<dyn Inspector>) -> Result<()> {
        let name = name.into();
        if self.inspectors.contains_key(&name) {
            return Err(InspectError::DuplicateInspector(name));
        }
        debug!(inspector = %name, "registered inspector");
        self.inspectors.insert(name, inspector);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Inspector>> {
        self.inspectors.get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.inspectors.keys().map(String::as_str).collect()
    }

    /// Reconfigure a registered inspector in place of its previous instance
    pub fn configure(&mut self, name: &str, config: &str) -> Result<()> {
        let current = self
            .get(name)
            .ok_or_else(|| InspectError::UnknownInspector(name.to_string()))?;
        let configured = current.configure(config).inspect_err(|e| {
            warn!(inspector = name, error = %e, "inspector configuration failed");
        })?;
        self.inspectors.insert(name.to_string(), configured);
        Ok(())
    }

    /// Build the pipeline described by `policy`, in policy order.
    ///
    /// Any configuration failure aborts the whole build.
    pub fn pipeline(&self, policy: &[InspectorPolicy]) -> Result<Pipeline> {
        let mut stages = Vec::with_capacity(policy.len());
        for entry in policy {
            let inspector = self
                .get(&entry.name)
                .ok_or_else(|| InspectError::UnknownInspector(entry.name.clone()))?;
            let configured = inspector.configure(&entry.config).inspect_err(|e| {
                warn!(inspector = %entry.name, error = %e, "inspector configuration failed");
            })?;
            stages.push((entry.name.clone(), configured));
        }
        info!(inspectors = stages.len(), "inspection pipeline ready");
        Ok(Pipeline { stages })
    }
}

/// Configured inspectors run in sequence against each request
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<(String, Arc<dyn Inspector>)>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Run every stage; the first rejection or error ends the run
    pub fn inspect(
        &self,
        client: &dyn ClusterClient,
        request: &CertificateSigningRequest,
    ) -> Result<Verdict> {
        for (name, inspector) in &self.stages {
            let verdict = inspector.inspect(client, request)?;
            if let Verdict::Reject(message) = &verdict {
                info!(inspector = %name, csr = request.name(), %message, "certificate request rejected");
                return Ok(verdict);
            }
        }
        Ok(Verdict::Pass)
    }
}

#[cfg(test)]
mod tests {
    use certvet_csr::fixtures;

    use super::*;
    use crate::{client::MemoryClient, minrsakeysize::MinRsaKeySize};

    #[derive(Debug)]
    struct Always(&'static str);

    impl Inspector for Always {
        fn name(&self) -> &'static str {
            "always"
        }

        fn configure(self: Arc<Self>, _config: &str) -> Result<Arc<dyn Inspector>> {
            Ok(self)
        }

        fn inspect(
            &self,
            _client: &dyn ClusterClient,
            _request: &CertificateSigningRequest,
        ) -> Result<Verdict> {
            Ok(Verdict::from_message(self.0))
        }
    }

    #[test]
    fn test_builtins() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.names(), [minrsakeysize::NAME]);
        assert_eq!(registry.get(minrsakeysize::NAME).unwrap().name(), minrsakeysize::NAME);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = Registry::with_builtins();
        let err = registry
            .register(minrsakeysize::NAME, Arc::new(MinRsaKeySize::new(1024)))
            .unwrap_err();
        assert!(matches!(err, InspectError::DuplicateInspector(ref n) if n == minrsakeysize::NAME));

        registry.register("always", Arc::new(Always(""))).unwrap();
        assert_eq!(registry.names(), ["always", minrsakeysize::NAME]);
    }

    #[test]
    fn test_configure_in_registry() {
        let mut registry = Registry::with_builtins();
        let client = MemoryClient::new();
        let request = fixtures::rsa_resource("r", 4096);

        registry.configure(minrsakeysize::NAME, "8192").unwrap();
        let inspector = registry.get(minrsakeysize::NAME).unwrap();
        assert_eq!(
            inspector.inspect(&client, &request).unwrap().message(),
            "Public key too small: 4096 < 8192"
        );

        assert!(registry.configure(minrsakeysize::NAME, "lots").is_err());
        // failed configuration leaves the previous instance in place
        let inspector = registry.get(minrsakeysize::NAME).unwrap();
        assert!(inspector.inspect(&client, &request).unwrap().is_reject());

        assert!(matches!(
            registry.configure("missing", ""),
            Err(InspectError::UnknownInspector(_))
        ));
    }

    #[test]
    fn test_pipeline_order_and_short_circuit() {
        let mut registry = Registry::with_builtins();
        registry.register("deny", Arc::new(Always("denied by policy"))).unwrap();
        registry.register("allow", Arc::new(Always(""))).unwrap();
        let client = MemoryClient::new();

        let pipeline = registry
            .pipeline(&[
                InspectorPolicy::new("allow", ""),
                InspectorPolicy::new(minrsakeysize::NAME, "2048"),
                InspectorPolicy::new("deny", ""),
            ])
            .unwrap();
        assert_eq!(pipeline.names(), ["allow", minrsakeysize::NAME, "deny"]);

        let small = fixtures::rsa_resource("small", 1024);
        assert_eq!(
            pipeline.inspect(&client, &small).unwrap().message(),
            "Public key too small: 1024 < 2048"
        );

        let large = fixtures::rsa_resource("large", 2048);
        assert_eq!(pipeline.inspect(&client, &large).unwrap().message(), "denied by policy");
    }

    #[test]
    fn test_pipeline_setup_errors() {
        let registry = Registry::with_builtins();

        let err = registry
            .pipeline(&[InspectorPolicy::new("signaturealgorithm", "")])
            .unwrap_err();
        assert!(matches!(err, InspectError::UnknownInspector(ref n) if n == "signaturealgorithm"));

        let err = registry
            .pipeline(&[InspectorPolicy::new(minrsakeysize::NAME, "-5")])
            .unwrap_err();
        assert!(matches!(err, InspectError::MalformedConfig { .. }));
    }

    #[test]
    fn test_empty_pipeline_passes() {
        let pipeline = Registry::with_builtins().pipeline(&[]).unwrap();
        assert!(pipeline.is_empty());
        let request = CertificateSigningRequest::new("anything", Vec::new());
        assert_eq!(pipeline.inspect(&MemoryClient::new(), &request).unwrap(), Verdict::Pass);
    }
}
