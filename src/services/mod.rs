pub mod calculator;
pub mod expenses;
pub mod feeding;
pub mod inventory;
pub mod medication;
pub mod notifications;
pub mod sales;

pub use calculator::CalculatorService;
pub use expenses::ExpenseService;
pub use feeding::FeedingService;
pub use inventory::{BatchMetrics, InventoryService};
pub use medication::MedicationService;
pub use notifications::NotificationService;
pub use sales::{SalesInvoice, SalesService};

use tracing::warn;

use crate::errors::ServiceError;
use crate::metrics;
use crate::models::BatchLookup;
use crate::validation::{Field, FieldError, FieldErrors, Rule};

/// Counts and logs a rejected form, then wraps its errors.
pub(crate) fn rejected(entity: &'static str, errors: FieldErrors) -> ServiceError {
    metrics::validation_rejected(entity);
    warn!(entity, errors = %errors, "form rejected");
    ServiceError::ValidationError(errors)
}

/// Batch picker check shared by the feeding and medication services: the
/// batch must be one of the active batches.
pub(crate) fn require_listed_batch(
    entity: &'static str,
    batch_id: &str,
    batches: &[BatchLookup],
) -> Result<(), ServiceError> {
    if batches.iter().any(|b| b.batch_id == batch_id) {
        Ok(())
    } else {
        Err(rejected(
            entity,
            FieldError::new(Field::BatchId, Rule::UnknownOption).into(),
        ))
    }
}
