//! Ordered lifecycle-hook flows around CRUD verbs
//!
//! [`HookPipeline`] owns a collection's hook set and exposes the pre- and
//! post-stage flows for each verb. Stages run strictly in order, each one an
//! await point; the first hook error aborts the flow and surfaces as a
//! [`MapperError::Hook`] carrying the failing point. The collection
//! orchestrates the adapter call between the pre and post flows, so an
//! aborted pre-stage means the adapter is never invoked.

use std::sync::Arc;

use crate::error::{HookError, MapperError, MapperResult};
use crate::hooks::{HookPoint, LifecycleHooks};
use crate::schema::{Criteria, Record};

#[derive(Clone)]
pub struct HookPipeline {
    hooks: Arc<dyn LifecycleHooks>,
}

impl HookPipeline {
    pub fn new(hooks: Arc<dyn LifecycleHooks>) -> Self {
        Self { hooks }
    }

    /// create: beforeValidation -> beforeCreate
    pub async fn before_create_flow(&self, values: &mut Record) -> MapperResult<()> {
        stage(
            HookPoint::BeforeValidation,
            self.hooks.before_validation(values).await,
        )?;
        stage(HookPoint::BeforeCreate, self.hooks.before_create(values).await)?;
        Ok(())
    }

    /// create: afterCreate, on the record the adapter returned
    pub async fn after_create_flow(&self, record: &mut Record) -> MapperResult<()> {
        stage(HookPoint::AfterCreate, self.hooks.after_create(record).await)
    }

    /// update: beforeValidation -> beforeUpdate -> beforeSave
    pub async fn before_update_flow(
        &self,
        criteria: &Criteria,
        values: &mut Record,
    ) -> MapperResult<()> {
        stage(
            HookPoint::BeforeValidation,
            self.hooks.before_validation(values).await,
        )?;
        stage(
            HookPoint::BeforeUpdate,
            self.hooks.before_update(criteria, values).await,
        )?;
        stage(HookPoint::BeforeSave, self.hooks.before_save(values).await)?;
        Ok(())
    }

    /// update: afterUpdate -> afterSave, per returned record
    pub async fn after_update_flow(&self, records: &mut [Record]) -> MapperResult<()> {
        for record in records.iter_mut() {
            stage(HookPoint::AfterUpdate, self.hooks.after_update(record).await)?;
            stage(HookPoint::AfterSave, self.hooks.after_save(record).await)?;
        }
        Ok(())
    }

    /// destroy: beforeDestroy
    pub async fn before_destroy_flow(&self, criteria: &Criteria) -> MapperResult<()> {
        stage(
            HookPoint::BeforeDestroy,
            self.hooks.before_destroy(criteria).await,
        )
    }

    /// destroy: afterDestroy, on the removed records
    pub async fn after_destroy_flow(&self, records: &mut Vec<Record>) -> MapperResult<()> {
        stage(
            HookPoint::AfterDestroy,
            self.hooks.after_destroy(records).await,
        )
    }

    /// find: beforeFind, criteria inspection only
    pub async fn before_find_flow(&self, criteria: &mut Criteria) -> MapperResult<()> {
        stage(HookPoint::BeforeFind, self.hooks.before_find(criteria).await)
    }

    /// find: afterFind, on the matched records
    pub async fn after_find_flow(&self, records: &mut Vec<Record>) -> MapperResult<()> {
        stage(HookPoint::AfterFind, self.hooks.after_find(records).await)
    }
}

fn stage(point: HookPoint, result: Result<(), HookError>) -> MapperResult<()> {
    result.map_err(|source| MapperError::Hook { point, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct OrderTracker {
        stages: Mutex<Vec<String>>,
        fail_at: Option<HookPoint>,
    }

    impl OrderTracker {
        fn failing_at(point: HookPoint) -> Self {
            Self {
                stages: Mutex::new(Vec::new()),
                fail_at: Some(point),
            }
        }

        fn record(&self, point: HookPoint) -> Result<(), HookError> {
            self.stages.lock().unwrap().push(point.to_string());
            if self.fail_at == Some(point) {
                return Err(HookError::new(format!("{} rejected", point)));
            }
            Ok(())
        }

        fn stages(&self) -> Vec<String> {
            self.stages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LifecycleHooks for Arc<OrderTracker> {
        async fn before_validation(&self, _values: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::BeforeValidation)
        }

        async fn before_create(&self, _values: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::BeforeCreate)
        }

        async fn after_create(&self, _record: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::AfterCreate)
        }

        async fn before_update(
            &self,
            _criteria: &Criteria,
            _values: &mut Record,
        ) -> Result<(), HookError> {
            self.record(HookPoint::BeforeUpdate)
        }

        async fn before_save(&self, _values: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::BeforeSave)
        }

        async fn after_update(&self, _record: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::AfterUpdate)
        }

        async fn after_save(&self, _record: &mut Record) -> Result<(), HookError> {
            self.record(HookPoint::AfterSave)
        }
    }

    fn record_with_name(name: &str) -> Record {
        let mut record = Record::new();
        record.insert("name".to_string(), json!(name));
        record
    }

    #[tokio::test]
    async fn create_pre_stages_run_in_order() {
        let tracker = Arc::new(OrderTracker::default());
        let pipeline = HookPipeline::new(Arc::new(tracker.clone()));

        let mut values = record_with_name("test");
        pipeline.before_create_flow(&mut values).await.unwrap();

        assert_eq!(tracker.stages(), vec!["beforeValidation", "beforeCreate"]);
    }

    #[tokio::test]
    async fn update_stages_run_in_order_per_returned_record() {
        let tracker = Arc::new(OrderTracker::default());
        let pipeline = HookPipeline::new(Arc::new(tracker.clone()));

        let criteria = record_with_name("criteria");
        let mut values = record_with_name("test");
        pipeline
            .before_update_flow(&criteria, &mut values)
            .await
            .unwrap();

        let mut returned = vec![record_with_name("a"), record_with_name("b")];
        pipeline.after_update_flow(&mut returned).await.unwrap();

        assert_eq!(
            tracker.stages(),
            vec![
                "beforeValidation",
                "beforeUpdate",
                "beforeSave",
                "afterUpdate",
                "afterSave",
                "afterUpdate",
                "afterSave",
            ]
        );
    }

    #[tokio::test]
    async fn hook_error_short_circuits_later_stages() {
        let tracker = Arc::new(OrderTracker::failing_at(HookPoint::BeforeValidation));
        let pipeline = HookPipeline::new(Arc::new(tracker.clone()));

        let mut values = record_with_name("test");
        let err = pipeline.before_create_flow(&mut values).await.unwrap_err();

        match err {
            MapperError::Hook { point, source } => {
                assert_eq!(point, HookPoint::BeforeValidation);
                assert_eq!(source.message(), "beforeValidation rejected");
            }
            other => panic!("expected hook error, got {:?}", other),
        }
        // beforeCreate never ran.
        assert_eq!(tracker.stages(), vec!["beforeValidation"]);
    }
}
