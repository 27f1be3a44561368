//! Lifecycle hook surface for collections
//!
//! A model author implements [`LifecycleHooks`] for the points they care
//! about; every method defaults to a no-op passthrough, so an absent hook
//! costs nothing. Hooks receive the values flowing through an operation and
//! may mutate them in place; whatever a hook leaves behind is what the next
//! pipeline stage observes.

use std::fmt;

use async_trait::async_trait;

use crate::error::HookError;
use crate::schema::{Criteria, Record};

/// Named lifecycle points, used to attribute hook failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    BeforeValidation,
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    BeforeSave,
    AfterUpdate,
    AfterSave,
    BeforeDestroy,
    AfterDestroy,
    BeforeFind,
    AfterFind,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPoint::BeforeValidation => "beforeValidation",
            HookPoint::BeforeCreate => "beforeCreate",
            HookPoint::AfterCreate => "afterCreate",
            HookPoint::BeforeUpdate => "beforeUpdate",
            HookPoint::BeforeSave => "beforeSave",
            HookPoint::AfterUpdate => "afterUpdate",
            HookPoint::AfterSave => "afterSave",
            HookPoint::BeforeDestroy => "beforeDestroy",
            HookPoint::AfterDestroy => "afterDestroy",
            HookPoint::BeforeFind => "beforeFind",
            HookPoint::AfterFind => "afterFind",
        };
        write!(f, "{}", name)
    }
}

/// User-supplied lifecycle hooks for one collection
///
/// Every method is an await point for the pipeline: the next stage does not
/// run until the hook returns. Returning an error aborts the operation; no
/// later stage (adapter call included) executes.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Runs first on `create`, `create_each` and `update`, before any
    /// verb-specific hook. Transient keys added here survive until the
    /// adapter boundary, where non-schema keys are stripped.
    async fn before_validation(&self, _values: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    async fn before_create(&self, _values: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs on the record the adapter returned from `create`.
    async fn after_create(&self, _record: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    async fn before_update(
        &self,
        _criteria: &Criteria,
        _values: &mut Record,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after `before_update`, before the adapter call.
    async fn before_save(&self, _values: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs once per record the adapter returned from `update`.
    async fn after_update(&self, _record: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after `after_update`, once per returned record.
    async fn after_save(&self, _record: &mut Record) -> Result<(), HookError> {
        Ok(())
    }

    async fn before_destroy(&self, _criteria: &Criteria) -> Result<(), HookError> {
        Ok(())
    }

    async fn after_destroy(&self, _records: &mut Vec<Record>) -> Result<(), HookError> {
        Ok(())
    }

    /// May inspect or narrow the criteria before the adapter runs the query.
    async fn before_find(&self, _criteria: &mut Criteria) -> Result<(), HookError> {
        Ok(())
    }

    async fn after_find(&self, _records: &mut Vec<Record>) -> Result<(), HookError> {
        Ok(())
    }
}

/// The no-op hook set used when a model defines no hooks
#[derive(Debug, Default)]
pub struct NoHooks;

#[async_trait]
impl LifecycleHooks for NoHooks {}
