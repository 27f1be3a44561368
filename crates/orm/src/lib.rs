//! # shoreline-orm: a data-mapper core
//!
//! Given a declarative attribute definition for a model, this crate
//! compiles a normalized storage schema, wraps CRUD operations in a
//! lifecycle-hook pipeline, and routes persistence calls to a pluggable
//! storage adapter selected by name.
//!
//! The pieces compose at build time: a [`CollectionDefinition`] goes into
//! [`Collection::build`], which compiles the [`Schema`], resolves the
//! adapter from an [`AdapterRegistry`], and returns a [`Collection`]
//! exposing `create`, `create_each`, `update`, `destroy` and `find`.

pub mod adapter;
pub mod collection;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod schema;

// Re-export core traits and types
pub use adapter::{Adapter, AdapterRef, AdapterRegistry};
pub use collection::{Collection, CollectionDefinition};
pub use error::{AdapterError, HookError, MapperError, MapperResult};
pub use hooks::{HookPoint, LifecycleHooks, NoHooks};
pub use pipeline::HookPipeline;
pub use schema::compiler::{AttributeDefinition, AttributeModifiers, AutoPolicy};
pub use schema::{AttributeType, Criteria, NormalizedAttribute, Record, Schema};
