use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{rejected, InventoryService};
use crate::errors::ServiceError;
use crate::forms::{Form, SalesEditForm, SalesForm};
use crate::metrics;
use crate::models::{PaymentMethod, PaymentStatus, SalesRecord};
use crate::repositories::Repository;

const ENTITY: &str = "sales";

/// Printable invoice for one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoice {
    pub invoice_number: String,
    pub sale_id: i64,
    pub batch_id: String,
    pub customer_name: Option<String>,
    pub quantity: u32,
    pub weight_total: Decimal,
    pub price_per_kg: Decimal,
    /// revenue divided by birds sold, 2 dp
    pub price_per_bird: Decimal,
    /// kg per bird sold, 2 dp
    pub average_weight: Decimal,
    pub total_revenue: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
}

impl SalesInvoice {
    pub fn from_record(record: &SalesRecord) -> Self {
        let birds = Decimal::from(record.quantity.max(1));
        Self {
            invoice_number: format!("INV-{}-{:04}", record.sale_date.format("%Y%m%d"), record.id),
            sale_id: record.id,
            batch_id: record.batch_id.clone(),
            customer_name: record.customer_name.clone(),
            quantity: record.quantity,
            weight_total: record.weight_total,
            price_per_kg: record.price_per_kg,
            price_per_bird: (record.total_revenue / birds).round_dp(2),
            average_weight: (record.weight_total / birds).round_dp(2),
            total_revenue: record.total_revenue,
            payment_method: record.payment_method,
            payment_status: record.payment_status,
        }
    }
}

/// Service for recording bird sales
#[derive(Clone)]
pub struct SalesService {
    repo: Arc<dyn Repository<SalesRecord>>,
    inventory: InventoryService,
}

impl SalesService {
    pub fn new(repo: Arc<dyn Repository<SalesRecord>>, inventory: InventoryService) -> Self {
        Self { repo, inventory }
    }

    /// Records a sale from an active batch. The quantity is checked against
    /// the batch's live count and revenue is derived from weight and price.
    /// The batch count itself is not decremented.
    #[instrument(skip(self, form), fields(batch_id = %form.batch_id))]
    pub async fn add(&self, form: &SalesForm) -> Result<SalesRecord, ServiceError> {
        let batches = self.inventory.lookups().await?;
        let entry = form.parse(&batches).map_err(|e| rejected(ENTITY, e))?;

        let record = self.repo.create(SalesRecord::from_entry(0, entry)).await?;
        metrics::record_created(ENTITY);
        info!(
            id = record.id,
            quantity = record.quantity,
            total_revenue = %record.total_revenue,
            "sale recorded"
        );
        Ok(record)
    }

    /// Edits a sale. The batch stays the one the sale was recorded against,
    /// whatever the form carries.
    #[instrument(skip(self, form))]
    pub async fn edit(&self, id: i64, form: &SalesEditForm) -> Result<SalesRecord, ServiceError> {
        let existing = self.get(id).await?;
        let mut entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        entry.batch_id = existing.batch_id;

        let record = self.repo.update(SalesRecord::from_entry(id, entry)).await?;
        info!(id, total_revenue = %record.total_revenue, "sale updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SalesRecord>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<SalesRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sales record", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<SalesRecord, ServiceError> {
        let record = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, "sale deleted");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn invoice(&self, id: i64) -> Result<SalesInvoice, ServiceError> {
        Ok(SalesInvoice::from_record(&self.get(id).await?))
    }
}
