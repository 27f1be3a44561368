//! Error types for the data-mapper core
//!
//! Build-time failures (schema compilation, adapter resolution) and
//! per-operation failures (hooks, adapter calls) share one public enum so
//! callers match on a single type. Per-operation variants attach the stage
//! that produced the error and carry the inner error unchanged.

use thiserror::Error;

use crate::hooks::HookPoint;

/// Result type alias for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Error type for collection build and CRUD operations
#[derive(Debug, Error)]
pub enum MapperError {
    /// An attribute definition was neither a type string nor an object
    #[error("invalid attribute definition for `{attribute}`: {reason}")]
    SchemaValidation { attribute: String, reason: String },

    /// The configured adapter identity is not present in the registry
    #[error("adapter `{identity}` is not registered")]
    Configuration { identity: String },

    /// A lifecycle hook signalled an error; the pipeline stopped there
    #[error("{point} hook failed")]
    Hook {
        point: HookPoint,
        #[source]
        source: HookError,
    },

    /// The adapter signalled an error from one of its CRUD calls
    #[error("adapter `{operation}` call failed")]
    Adapter {
        operation: &'static str,
        #[source]
        source: AdapterError,
    },
}

impl MapperError {
    pub(crate) fn schema_validation(attribute: &str, reason: &str) -> Self {
        Self::SchemaValidation {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn configuration(identity: &str) -> Self {
        Self::Configuration {
            identity: identity.to_string(),
        }
    }
}

/// Error signalled by a user-supplied lifecycle hook
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error signalled by a storage adapter
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AdapterError {
    message: String,
}

impl AdapterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
