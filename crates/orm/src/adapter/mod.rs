//! Storage adapter abstraction
//!
//! An adapter is the only true I/O boundary of the mapper: a pluggable
//! storage backend implementing the uniform asynchronous CRUD contract.
//! The core performs no retries and no shaping of arguments or results at
//! this boundary; all value normalization happens before a call reaches an
//! adapter and all hook mutation happens after it returns.

pub mod registry;

pub use registry::{AdapterRef, AdapterRegistry};

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::schema::{Criteria, Record};

/// Uniform asynchronous CRUD contract implemented by storage backends
///
/// Every method receives the collection name it operates on; criteria and
/// values arrive already cleaned of non-schema keys.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Persist a new record, returning it as stored
    async fn create(&self, collection: &str, values: Record) -> Result<Record, AdapterError>;

    /// Update records matching `criteria`, returning the updated records
    async fn update(
        &self,
        collection: &str,
        criteria: Criteria,
        values: Record,
    ) -> Result<Vec<Record>, AdapterError>;

    /// Remove records matching `criteria`, returning the removed records
    async fn destroy(&self, collection: &str, criteria: Criteria)
        -> Result<Vec<Record>, AdapterError>;

    /// Return records matching `criteria`
    async fn find(&self, collection: &str, criteria: Criteria)
        -> Result<Vec<Record>, AdapterError>;
}
