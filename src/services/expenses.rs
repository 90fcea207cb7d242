use std::sync::Arc;

use tracing::{info, instrument};

use super::rejected;
use crate::errors::ServiceError;
use crate::forms::{ExpenseForm, Form};
use crate::metrics;
use crate::models::ExpenseRecord;
use crate::repositories::Repository;

const ENTITY: &str = "expense";

/// Service for farm expenses
#[derive(Clone)]
pub struct ExpenseService {
    repo: Arc<dyn Repository<ExpenseRecord>>,
}

impl ExpenseService {
    pub fn new(repo: Arc<dyn Repository<ExpenseRecord>>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, form))]
    pub async fn add(&self, form: &ExpenseForm) -> Result<ExpenseRecord, ServiceError> {
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        let record = self.repo.create(ExpenseRecord::from_entry(0, entry)).await?;
        metrics::record_created(ENTITY);
        info!(
            id = record.id,
            expense_type = %record.expense_type,
            amount = %record.amount,
            "expense recorded"
        );
        Ok(record)
    }

    #[instrument(skip(self, form))]
    pub async fn edit(&self, id: i64, form: &ExpenseForm) -> Result<ExpenseRecord, ServiceError> {
        self.get(id).await?;
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        let record = self.repo.update(ExpenseRecord::from_entry(id, entry)).await?;
        info!(id, amount = %record.amount, "expense updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ExpenseRecord>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<ExpenseRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Expense", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<ExpenseRecord, ServiceError> {
        let record = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, "expense deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseType;
    use crate::repositories::InMemoryRepository;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn form(amount: &str) -> ExpenseForm {
        ExpenseForm {
            expense_date: "2025-04-03".into(),
            expense_type: "Utilities".into(),
            amount: amount.into(),
            payment_method: "Bank Transfer".into(),
            description: "Electricity bill".into(),
            vendor: "Power Company".into(),
            receipt_number: String::new(),
        }
    }

    #[tokio::test]
    async fn add_then_edit() {
        let service = ExpenseService::new(Arc::new(InMemoryRepository::new("Expense")));
        let record = service.add(&form("800")).await.unwrap();
        assert_eq!(record.expense_type, ExpenseType::Utilities);
        assert_eq!(record.receipt_number, None);

        let updated = service.edit(record.id, &form("850.5")).await.unwrap();
        assert_eq!(updated.amount, dec!(850.5));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_form_is_not_stored() {
        let service = ExpenseService::new(Arc::new(InMemoryRepository::new("Expense")));
        assert_matches!(
            service.add(&form("-10")).await,
            Err(ServiceError::ValidationError(_))
        );
        assert!(service.list().await.unwrap().is_empty());
    }
}
