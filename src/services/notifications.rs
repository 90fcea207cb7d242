use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::metrics;
use crate::models::{
    MedicationRecord, NewNotification, Notification, NotificationKind, RelatedRef,
};
use crate::repositories::Repository;

const ENTITY: &str = "notification";

/// Service for the notification inbox
#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn Repository<Notification>>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn Repository<Notification>>) -> Self {
        Self { repo }
    }

    /// All notifications, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Notification>, ServiceError> {
        let mut notifications = self.repo.list().await?;
        notifications.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self) -> Result<usize, ServiceError> {
        Ok(self.repo.list().await?.iter().filter(|n| !n.read).count())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Notification, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))
    }

    #[instrument(skip(self, new), fields(title = %new.title))]
    pub async fn create(&self, new: NewNotification) -> Result<Notification, ServiceError> {
        let notification = self.repo.create(Notification::from_new(0, new)).await?;
        metrics::record_created(ENTITY);
        info!(id = notification.id, kind = %notification.kind, "notification created");
        Ok(notification)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i64) -> Result<Notification, ServiceError> {
        self.set_read(id, true).await
    }

    #[instrument(skip(self))]
    pub async fn mark_unread(&self, id: i64) -> Result<Notification, ServiceError> {
        self.set_read(id, false).await
    }

    /// Marks every unread notification read and returns how many changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<usize, ServiceError> {
        let mut changed = 0;
        for mut notification in self.repo.list().await? {
            if !notification.read {
                notification.read = true;
                self.repo.update(notification).await?;
                changed += 1;
            }
        }
        info!(changed, "marked all notifications read");
        Ok(changed)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Notification, ServiceError> {
        let notification = self.repo.delete(id).await?;
        metrics::record_deleted(ENTITY);
        info!(id, "notification deleted");
        Ok(notification)
    }

    /// Opening a notification marks it read and yields where to navigate,
    /// if it points at anything.
    #[instrument(skip(self))]
    pub async fn open(&self, id: i64) -> Result<Option<String>, ServiceError> {
        let notification = self.set_read(id, true).await?;
        let route = notification.related.as_ref().map(RelatedRef::route);
        debug!(id, route = ?route, "notification opened");
        Ok(route)
    }

    /// Creates one "vaccination due" notification per vaccine record, unless
    /// the same reminder already exists. Returns the newly created ones.
    #[instrument(skip(self, due))]
    pub async fn remind_vaccinations(
        &self,
        due: &[MedicationRecord],
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, ServiceError> {
        let mut existing = self.repo.list().await?;
        let mut created = Vec::new();
        for record in due {
            let Some(next_due_date) = record.medication.next_due_date() else {
                continue;
            };
            let new = NewNotification {
                title: "Vaccination Due".to_string(),
                message: format!(
                    "Batch {} is due for {} vaccination on {}",
                    record.batch_id, record.medication_name, next_due_date
                ),
                kind: NotificationKind::Vaccination,
                date: now,
                related: Some(RelatedRef::Batch(record.batch_id.clone())),
            };
            if existing.iter().any(|n| is_same_reminder(n, &new)) {
                debug!(batch_id = %record.batch_id, "reminder already present");
                continue;
            }
            let notification = self.create(new).await?;
            existing.push(notification.clone());
            created.push(notification);
        }
        Ok(created)
    }

    async fn set_read(&self, id: i64, read: bool) -> Result<Notification, ServiceError> {
        let mut notification = self.get(id).await?;
        if notification.read == read {
            return Ok(notification);
        }
        notification.read = read;
        self.repo.update(notification).await
    }
}

fn is_same_reminder(existing: &Notification, new: &NewNotification) -> bool {
    existing.kind == new.kind && existing.related == new.related && existing.message == new.message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationMethod, Medication};
    use crate::repositories::InMemoryRepository;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(InMemoryRepository::new("Notification")))
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 9, hour, 0, 0).unwrap()
    }

    fn new(title: &str, hour: u32, related: Option<RelatedRef>) -> NewNotification {
        NewNotification {
            title: title.into(),
            message: String::new(),
            kind: NotificationKind::Info,
            date: at(hour),
            related,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let service = service();
        service.create(new("early", 8, None)).await.unwrap();
        service.create(new("late", 18, None)).await.unwrap();
        service.create(new("noon", 12, None)).await.unwrap();
        let titles: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["late", "noon", "early"]);
    }

    #[tokio::test]
    async fn open_marks_read_and_routes() {
        let service = service();
        let batch = service
            .create(new("a", 8, Some(RelatedRef::Batch("B2025001".into()))))
            .await
            .unwrap();
        let plain = service.create(new("b", 9, None)).await.unwrap();
        assert_eq!(service.unread_count().await.unwrap(), 2);

        assert_eq!(
            service.open(batch.id).await.unwrap().as_deref(),
            Some("/inventory/B2025001")
        );
        assert_eq!(service.open(plain.id).await.unwrap(), None);
        assert_eq!(service.unread_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_all_read_counts_changes() {
        let service = service();
        service.create(new("a", 8, None)).await.unwrap();
        let b = service.create(new("b", 9, None)).await.unwrap();
        service.mark_read(b.id).await.unwrap();
        assert_eq!(service.mark_all_read().await.unwrap(), 1);
        assert_eq!(service.mark_all_read().await.unwrap(), 0);
        assert_matches!(service.delete(42).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn vaccination_reminders_are_not_duplicated() {
        let service = service();
        let record = MedicationRecord {
            id: 1,
            batch_id: "B2025001".into(),
            application_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            medication: Medication::Vaccine {
                next_due_date: NaiveDate::from_ymd_opt(2025, 4, 16).unwrap(),
            },
            medication_name: "Newcastle Disease Vaccine".into(),
            dosage: "1 dose/bird".into(),
            application_method: ApplicationMethod::Water,
            cost: Decimal::from(500),
            notes: None,
        };
        let first = service
            .remind_vaccinations(std::slice::from_ref(&record), at(9))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(
            first[0].message,
            "Batch B2025001 is due for Newcastle Disease Vaccine vaccination on 2025-04-16"
        );
        let again = service.remind_vaccinations(&[record], at(10)).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
