use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::{fleet_rollup, sum_by_category, CategoryTotal, FleetRollup};
use crate::errors::ServiceError;
use crate::models::{BatchStatus, Breed, InventoryBatch};

/// Snapshot of the flock. Batches are not narrowed by the time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    #[serde(flatten)]
    pub fleet: FleetRollup,
    /// live birds per breed
    pub breed_distribution: Vec<CategoryTotal<Breed>>,
    /// batch count per status
    pub status_breakdown: Vec<CategoryTotal<BatchStatus>>,
}

pub fn inventory_report(batches: &[InventoryBatch]) -> Result<InventoryReport, ServiceError> {
    Ok(InventoryReport {
        fleet: fleet_rollup(batches),
        breed_distribution: sum_by_category(batches, |b| b.breed, |b| Decimal::from(b.current_count))?,
        status_breakdown: sum_by_category(batches, |b| b.status, |_| Decimal::ONE)?,
    })
}
