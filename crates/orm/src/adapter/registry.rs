//! Adapter registry and identity resolution
//!
//! Models name their adapter; the registry maps that identity to a concrete
//! [`Adapter`] instance. Resolution happens exactly once, when a collection
//! is built, so a misconfigured identity is a build-time error rather than
//! a surprise on the first CRUD call. The registry is an explicit object
//! passed into the collection factory; there is no ambient global state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::Adapter;
use crate::error::{MapperError, MapperResult};

/// How a model refers to its adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterRef {
    /// Use the registry's `default` identity
    Default,
    /// A fixed adapter identity
    Identity(String),
    /// An identity per environment name, e.g. `development` -> `memory`
    PerEnvironment(HashMap<String, String>),
}

impl AdapterRef {
    pub fn identity(identity: impl Into<String>) -> Self {
        AdapterRef::Identity(identity.into())
    }
}

impl Default for AdapterRef {
    fn default() -> Self {
        AdapterRef::Default
    }
}

/// Registry of storage adapters keyed by identity
///
/// Mirrors the external adapter configuration: a set of named adapters with
/// a distinguished `default` identity used when a model specifies none.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn Adapter>>,
    default_identity: Option<String>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under an identity
    pub fn register(&mut self, identity: impl Into<String>, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(identity.into(), adapter);
    }

    /// Name the identity the `default` reference points at
    pub fn set_default(&mut self, identity: impl Into<String>) {
        self.default_identity = Some(identity.into());
    }

    /// Identities of every registered adapter
    pub fn registered_identities(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    /// Resolve an adapter reference to a concrete instance
    ///
    /// `environment` selects the identity for the per-environment form.
    /// Fails with a configuration error when the identity (or the `default`
    /// identity) is absent.
    pub fn resolve(
        &self,
        reference: &AdapterRef,
        environment: &str,
    ) -> MapperResult<Arc<dyn Adapter>> {
        let identity = match reference {
            AdapterRef::Default => self
                .default_identity
                .as_deref()
                .ok_or_else(|| MapperError::configuration("default"))?,
            AdapterRef::Identity(identity) => identity.as_str(),
            AdapterRef::PerEnvironment(map) => map
                .get(environment)
                .map(String::as_str)
                .ok_or_else(|| MapperError::configuration(environment))?,
        };

        self.adapters
            .get(identity)
            .cloned()
            .ok_or_else(|| MapperError::configuration(identity))
    }
}
