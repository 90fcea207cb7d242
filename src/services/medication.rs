use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{debug, info, instrument};

use super::{rejected, require_listed_batch, InventoryService};
use crate::errors::ServiceError;
use crate::forms::{Form, MedicationForm};
use crate::metrics;
use crate::models::MedicationRecord;
use crate::repositories::Repository;

const ENTITY: &str = "medication";

/// Service for managing medication and vaccination records
#[derive(Clone)]
pub struct MedicationService {
    repo: Arc<dyn Repository<MedicationRecord>>,
    inventory: InventoryService,
}

impl MedicationService {
    pub fn new(repo: Arc<dyn Repository<MedicationRecord>>, inventory: InventoryService) -> Self {
        Self { repo, inventory }
    }

    #[instrument(skip(self, form), fields(batch_id = %form.batch_id))]
    pub async fn add(&self, form: &MedicationForm) -> Result<MedicationRecord, ServiceError> {
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        let batches = self.inventory.lookups().await?;
        require_listed_batch(ENTITY, &entry.batch_id, &batches)?;

        let record = self
            .repo
            .create(MedicationRecord::from_entry(0, entry))
            .await?;
        metrics::record_created(ENTITY);
        info!(
            id = record.id,
            kind = %record.medication.kind(),
            name = %record.medication_name,
            "medication recorded"
        );
        Ok(record)
    }

    #[instrument(skip(self, form))]
    pub async fn edit(
        &self,
        id: i64,
        form: &MedicationForm,
    ) -> Result<MedicationRecord, ServiceError> {
        let existing = self.get(id).await?;
        let entry = form.parse(&()).map_err(|e| rejected(ENTITY, e))?;
        if entry.batch_id != existing.batch_id {
            let batches = self.inventory.lookups().await?;
            require_listed_batch(ENTITY, &entry.batch_id, &batches)?;
        }

        let record = self
            .repo
            .update(MedicationRecord::from_entry(id, entry))
            .await?;
        info!(id, "medication updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<MedicationRecord>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<MedicationRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Medication record", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<MedicationRecord, ServiceError> {
        let record = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, "medication deleted");
        Ok(record)
    }

    /// Vaccine records whose next dose falls in `[today, today + days]`,
    /// soonest first.
    #[instrument(skip(self))]
    pub async fn vaccinations_due(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<MedicationRecord>, ServiceError> {
        let until = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        let mut due: Vec<_> = self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(|r| {
                r.medication
                    .next_due_date()
                    .is_some_and(|date| date >= today && date <= until)
            })
            .collect();
        due.sort_by_key(|r| r.medication.next_due_date());
        debug!(count = due.len(), "vaccinations due");
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::BatchForm;
    use crate::models::Medication;
    use crate::repositories::InMemoryRepository;

    async fn service() -> MedicationService {
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
        MedicationService::new(
            Arc::new(InMemoryRepository::new("Medication record")),
            inventory,
        )
    }

    fn vaccine(name: &str, due: &str) -> MedicationForm {
        MedicationForm {
            batch_id: "B2025001".into(),
            application_date: "2025-04-02".into(),
            medication_type: "Vaccine".into(),
            medication_name: name.into(),
            dosage: "1 dose/bird".into(),
            application_method: "Water".into(),
            cost: "500".into(),
            next_due_date: due.into(),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn vaccine_record_carries_due_date() {
        let record = service()
            .await
            .add(&vaccine("Newcastle", "2025-04-16"))
            .await
            .unwrap();
        assert_eq!(
            record.medication,
            Medication::Vaccine {
                next_due_date: date("2025-04-16")
            }
        );
        assert_eq!(record.medication.withdrawal_period_days(), 0);
    }

    #[tokio::test]
    async fn due_window_is_inclusive() {
        let service = service().await;
        service.add(&vaccine("IB", "2025-04-20")).await.unwrap();
        service.add(&vaccine("Newcastle", "2025-04-16")).await.unwrap();
        service.add(&vaccine("Gumboro", "2025-05-30")).await.unwrap();

        let names: Vec<_> = service
            .vaccinations_due(date("2025-04-13"), 7)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.medication_name)
            .collect();
        assert_eq!(names, ["Newcastle", "IB"]);
    }
}
