//! Collections: the operational data-access objects
//!
//! A model definition (identity, attributes, adapter reference, hooks, auto
//! policy) goes through [`Collection::build`] exactly once. Build compiles
//! the schema and resolves the adapter synchronously, so a bad definition
//! fails fast and never produces a usable collection. Each CRUD method then
//! flows pre-hooks -> value cleaning -> adapter call -> post-hooks.

use std::sync::Arc;

use serde_json::Value;

use crate::adapter::{Adapter, AdapterRef, AdapterRegistry};
use crate::error::{MapperError, MapperResult};
use crate::hooks::{LifecycleHooks, NoHooks};
use crate::pipeline::HookPipeline;
use crate::schema::compiler::AutoPolicy;
use crate::schema::{Criteria, Record, Schema};

/// Everything needed to build a collection
pub struct CollectionDefinition {
    pub identity: String,
    pub attributes: serde_json::Map<String, Value>,
    pub adapter: AdapterRef,
    pub hooks: Option<Arc<dyn LifecycleHooks>>,
    pub auto: AutoPolicy,
    /// Selects the identity when `adapter` is the per-environment form.
    pub environment: String,
}

impl CollectionDefinition {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            attributes: serde_json::Map::new(),
            adapter: AdapterRef::Default,
            hooks: None,
            auto: AutoPolicy::default(),
            environment: "development".to_string(),
        }
    }

    pub fn attributes(mut self, attributes: serde_json::Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn adapter(mut self, adapter: AdapterRef) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn auto_policy(mut self, auto: AutoPolicy) -> Self {
        self.auto = auto;
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// A runtime collection bound to one schema, one adapter and one hook set
#[derive(Clone)]
pub struct Collection {
    identity: String,
    schema: Arc<Schema>,
    adapter: Arc<dyn Adapter>,
    pipeline: HookPipeline,
}

impl Collection {
    /// Build a collection from its definition
    ///
    /// Compiles the schema and resolves the adapter identity against the
    /// registry; either failure prevents the collection from existing at
    /// all, so CRUD calls never hit configuration problems.
    pub fn build(
        definition: CollectionDefinition,
        registry: &AdapterRegistry,
    ) -> MapperResult<Self> {
        let schema = Schema::compile(&definition.attributes, &definition.auto)?;
        let adapter = registry.resolve(&definition.adapter, &definition.environment)?;
        let hooks = definition.hooks.unwrap_or_else(|| Arc::new(NoHooks));

        Ok(Self {
            identity: definition.identity,
            schema: Arc::new(schema),
            adapter,
            pipeline: HookPipeline::new(hooks),
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create one record
    pub async fn create(&self, mut values: Record) -> MapperResult<Record> {
        self.pipeline.before_create_flow(&mut values).await?;
        let cleaned = self.schema.clean_values(values);

        tracing::debug!(collection = %self.identity, "creating record");
        let mut created = self
            .adapter
            .create(&self.identity, cleaned)
            .await
            .map_err(|source| MapperError::Adapter {
                operation: "create",
                source,
            })?;

        self.pipeline.after_create_flow(&mut created).await?;
        Ok(created)
    }

    /// Create a batch of records
    ///
    /// Each element runs the full single-record pipeline independently; the
    /// result is positionally aligned with the input, and the first error
    /// aborts the batch.
    pub async fn create_each(&self, records: Vec<Record>) -> MapperResult<Vec<Record>> {
        let mut created = Vec::with_capacity(records.len());
        for values in records {
            created.push(self.create(values).await?);
        }
        Ok(created)
    }

    /// Update records matching `criteria`
    pub async fn update(&self, criteria: Criteria, mut values: Record) -> MapperResult<Vec<Record>> {
        self.pipeline
            .before_update_flow(&criteria, &mut values)
            .await?;
        let cleaned = self.schema.clean_values(values);

        tracing::debug!(collection = %self.identity, "updating records");
        let mut updated = self
            .adapter
            .update(&self.identity, criteria, cleaned)
            .await
            .map_err(|source| MapperError::Adapter {
                operation: "update",
                source,
            })?;

        self.pipeline.after_update_flow(&mut updated).await?;
        Ok(updated)
    }

    /// Destroy records matching `criteria`
    pub async fn destroy(&self, criteria: Criteria) -> MapperResult<Vec<Record>> {
        self.pipeline.before_destroy_flow(&criteria).await?;

        tracing::debug!(collection = %self.identity, "destroying records");
        let mut destroyed = self
            .adapter
            .destroy(&self.identity, criteria)
            .await
            .map_err(|source| MapperError::Adapter {
                operation: "destroy",
                source,
            })?;

        self.pipeline.after_destroy_flow(&mut destroyed).await?;
        Ok(destroyed)
    }

    /// Find records matching `criteria`
    pub async fn find(&self, mut criteria: Criteria) -> MapperResult<Vec<Record>> {
        self.pipeline.before_find_flow(&mut criteria).await?;

        tracing::debug!(collection = %self.identity, "finding records");
        let mut matched = self
            .adapter
            .find(&self.identity, criteria)
            .await
            .map_err(|source| MapperError::Adapter {
                operation: "find",
                source,
            })?;

        self.pipeline.after_find_flow(&mut matched).await?;
        Ok(matched)
    }
}
