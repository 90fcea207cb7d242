use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::rejected;
use crate::errors::ServiceError;
use crate::forms::{BatchEditForm, BatchForm, Form};
use crate::metrics;
use crate::models::{BatchLookup, InventoryBatch};
use crate::repositories::Repository;

const ENTITY: &str = "inventory";

/// Figures shown on a batch's detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetrics {
    pub batch_id: String,
    pub reduction: u32,
    /// percent of the initial count
    pub mortality_rate: Decimal,
    pub age_in_days: i64,
}

/// Service for managing inventory batches
#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn Repository<InventoryBatch>>,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn Repository<InventoryBatch>>) -> Self {
        Self { repo }
    }

    /// Validates the form and stores a new active batch. The batch id must
    /// not be taken.
    #[instrument(skip(self, form), fields(batch_id = %form.batch_id))]
    pub async fn add(&self, form: &BatchForm) -> Result<InventoryBatch, ServiceError> {
        let new = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        self.ensure_unique(&new.batch_id, None).await?;

        let batch = self.repo.create(InventoryBatch::from_new(0, new)).await?;
        metrics::record_created(ENTITY);
        info!(id = batch.id, batch_id = %batch.batch_id, "batch added");
        Ok(batch)
    }

    /// Applies the edit form to an existing batch.
    #[instrument(skip(self, form))]
    pub async fn edit(&self, id: i64, form: &BatchEditForm) -> Result<InventoryBatch, ServiceError> {
        let mut batch = self.get(id).await?;
        let update = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        self.ensure_unique(&update.batch_id, Some(id)).await?;

        batch.apply(update);
        let batch = self.repo.update(batch).await?;
        info!(id, batch_id = %batch.batch_id, "batch updated");
        Ok(batch)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<InventoryBatch>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<InventoryBatch, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_batch_id(
        &self,
        batch_id: &str,
    ) -> Result<Option<InventoryBatch>, ServiceError> {
        let found = self
            .repo
            .list()
            .await?
            .into_iter()
            .find(|b| b.batch_id == batch_id);
        debug!(batch_id, found = found.is_some(), "batch lookup");
        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<InventoryBatch, ServiceError> {
        let batch = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, batch_id = %batch.batch_id, "batch deleted");
        Ok(batch)
    }

    /// Picker entries for the sales, feeding and medication forms. Only
    /// active batches are offered.
    #[instrument(skip(self))]
    pub async fn lookups(&self) -> Result<Vec<BatchLookup>, ServiceError> {
        let lookups: Vec<_> = self
            .repo
            .list()
            .await?
            .iter()
            .filter(|b| b.is_active())
            .map(InventoryBatch::lookup)
            .collect();
        debug!(count = lookups.len(), "batch lookups");
        Ok(lookups)
    }

    /// Mortality and age of one batch as of `today`.
    #[instrument(skip(self))]
    pub async fn metrics(&self, id: i64, today: NaiveDate) -> Result<BatchMetrics, ServiceError> {
        let batch = self.get(id).await?;
        Ok(BatchMetrics {
            reduction: batch.reduction(),
            mortality_rate: batch.mortality_rate(),
            age_in_days: batch.age_in_days(today),
            batch_id: batch.batch_id,
        })
    }

    async fn ensure_unique(&self, batch_id: &str, except: Option<i64>) -> Result<(), ServiceError> {
        match self.find_by_batch_id(batch_id).await? {
            Some(existing) if Some(existing.id) != except => Err(ServiceError::Conflict(format!(
                "Batch {batch_id} already exists"
            ))),
            _ => Ok(()),
        }
    }
}
