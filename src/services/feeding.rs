use std::sync::Arc;

use tracing::{info, instrument};

use super::{rejected, require_listed_batch, InventoryService};
use crate::errors::ServiceError;
use crate::forms::{FeedingForm, Form};
use crate::metrics;
use crate::models::FeedingRecord;
use crate::repositories::Repository;

const ENTITY: &str = "feeding";

/// Service for managing feeding records
#[derive(Clone)]
pub struct FeedingService {
    repo: Arc<dyn Repository<FeedingRecord>>,
    inventory: InventoryService,
}

impl FeedingService {
    pub fn new(repo: Arc<dyn Repository<FeedingRecord>>, inventory: InventoryService) -> Self {
        Self { repo, inventory }
    }

    /// Records a feeding against an active batch. The total cost is
    /// derived from quantity and unit cost when the form is parsed.
    #[instrument(skip(self, form), fields(batch_id = %form.batch_id))]
    pub async fn add(&self, form: &FeedingForm) -> Result<FeedingRecord, ServiceError> {
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        let batches = self.inventory.lookups().await?;
        require_listed_batch(ENTITY, &entry.batch_id, &batches)?;

        let record = self.repo.create(FeedingRecord::from_entry(0, entry)).await?;
        metrics::record_created(ENTITY);
        info!(id = record.id, total_cost = %record.total_cost, "feeding recorded");
        Ok(record)
    }

    #[instrument(skip(self, form))]
    pub async fn edit(&self, id: i64, form: &FeedingForm) -> Result<FeedingRecord, ServiceError> {
        let existing = self.get(id).await?;
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        if entry.batch_id != existing.batch_id {
            let batches = self.inventory.lookups().await?;
            require_listed_batch(ENTITY, &entry.batch_id, &batches)?;
        }

        let record = self.repo.update(FeedingRecord::from_entry(id, entry)).await?;
        info!(id, total_cost = %record.total_cost, "feeding updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<FeedingRecord>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn list_for_batch(&self, batch_id: &str) -> Result<Vec<FeedingRecord>, ServiceError> {
        let mut records = self.repo.list().await?;
        records.retain(|r| r.batch_id == batch_id);
        Ok(records)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<FeedingRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Feeding record", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<FeedingRecord, ServiceError> {
        let record = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, "feeding deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::BatchForm;
    use crate::repositories::InMemoryRepository;
    use crate::validation::{Field, Rule};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    async fn service() -> FeedingService {
        let inventory = InventoryService::new(Arc::new(InMemoryRepository::new("Batch")));
        inventory
            .add(&BatchForm {
                batch_id: "B2025001".into(),
                entry_date: "2025-04-01".into(),
                initial_count: "5000".into(),
                breed: "Cobb 500".into(),
                source: "Local Hatchery".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        FeedingService::new(Arc::new(InMemoryRepository::new("Feeding record")), inventory)
    }

    fn form(batch_id: &str) -> FeedingForm {
        FeedingForm {
            batch_id: batch_id.into(),
            feed_date: "2025-04-08".into(),
            feed_type: "Grower Feed".into(),
            quantity: "400".into(),
            cost_per_kg: "1.15".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn add_derives_total_cost() {
        let service = service().await;
        let record = service.add(&form("B2025001")).await.unwrap();
        assert_eq!(record.total_cost, dec!(460));
    }

    #[tokio::test]
    async fn unknown_batch_is_rejected() {
        let service = service().await;
        let err = service.add(&form("B404")).await.unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.get(Field::BatchId).unwrap().rule, Rule::UnknownOption);
    }

    #[tokio::test]
    async fn edit_recomputes_total() {
        let service = service().await;
        let record = service.add(&form("B2025001")).await.unwrap();
        let mut edit = FeedingForm::from_record(&record);
        edit.quantity = "500".into();
        let updated = service.edit(record.id, &edit).await.unwrap();
        assert_eq!(updated.total_cost, dec!(575));
        assert_matches!(
            service.edit(99, &edit).await,
            Err(ServiceError::NotFound(_))
        );
    }
}
