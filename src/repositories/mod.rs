use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::errors::ServiceError;
use crate::models::{
    ExpenseRecord, FeedingRecord, InventoryBatch, MedicationRecord, Notification, SalesRecord,
};

/// A stored record with a repository-assigned numeric id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        })+
    };
}

impl_record!(
    InventoryBatch,
    FeedingRecord,
    MedicationRecord,
    SalesRecord,
    ExpenseRecord,
    Notification,
);

/// Data-access abstraction services are written against.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All records in id order.
    async fn list(&self) -> Result<Vec<T>, ServiceError>;

    async fn get(&self, id: i64) -> Result<Option<T>, ServiceError>;

    /// Stores `record` under a fresh id and returns it with that id set.
    async fn create(&self, record: T) -> Result<T, ServiceError>;

    /// Replaces the record with the same id.
    async fn update(&self, record: T) -> Result<T, ServiceError>;

    /// Removes and returns the record.
    async fn delete(&self, id: i64) -> Result<T, ServiceError>;
}

/// Process-local repository. Each call optionally waits a fixed latency,
/// standing in for a future backend round trip.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    entity: &'static str,
    records: DashMap<i64, T>,
    next_id: AtomicI64,
    latency: Duration,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(entity: &'static str) -> Self {
        Self::with_latency(entity, Duration::ZERO)
    }

    pub fn with_latency(entity: &'static str, latency: Duration) -> Self {
        Self {
            entity,
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn missing(&self, id: i64) -> ServiceError {
        ServiceError::not_found(self.entity, id)
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        self.simulate_latency().await;
        let mut records: Vec<T> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id());
        debug!(entity = self.entity, count = records.len(), "listed records");
        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<Option<T>, ServiceError> {
        self.simulate_latency().await;
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, mut record: T) -> Result<T, ServiceError> {
        self.simulate_latency().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.set_id(id);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> Result<T, ServiceError> {
        self.simulate_latency().await;
        let id = record.id();
        match self.records.get_mut(&id) {
            Some(mut slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(self.missing(id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<T, ServiceError> {
        self.simulate_latency().await;
        self.records
            .remove(&id)
            .map(|(_, record)| record)
            .ok_or_else(|| self.missing(id))
    }
}

/// One repository per record type, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub batches: Arc<dyn Repository<InventoryBatch>>,
    pub feeding: Arc<dyn Repository<FeedingRecord>>,
    pub medication: Arc<dyn Repository<MedicationRecord>>,
    pub sales: Arc<dyn Repository<SalesRecord>>,
    pub expenses: Arc<dyn Repository<ExpenseRecord>>,
    pub notifications: Arc<dyn Repository<Notification>>,
}

impl Repositories {
    pub fn in_memory(latency: Duration) -> Self {
        Self {
            batches: Arc::new(InMemoryRepository::with_latency("Batch", latency)),
            feeding: Arc::new(InMemoryRepository::with_latency("Feeding record", latency)),
            medication: Arc::new(InMemoryRepository::with_latency(
                "Medication record",
                latency,
            )),
            sales: Arc::new(InMemoryRepository::with_latency("Sales record", latency)),
            expenses: Arc::new(InMemoryRepository::with_latency("Expense", latency)),
            notifications: Arc::new(InMemoryRepository::with_latency("Notification", latency)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewNotification, NotificationKind};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn notification(title: &str) -> Notification {
        Notification::from_new(
            0,
            NewNotification {
                title: title.into(),
                message: String::new(),
                kind: NotificationKind::Info,
                date: Utc::now(),
                related: None,
            },
        )
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = InMemoryRepository::new("Notification");
        let first = repo.create(notification("a")).await.unwrap();
        let second = repo.create(notification("b")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[tokio::test]
    async fn update_and_delete_need_an_existing_record() {
        let repo = InMemoryRepository::new("Notification");
        let mut stored = repo.create(notification("a")).await.unwrap();
        stored.read = true;
        assert!(repo.update(stored.clone()).await.unwrap().read);

        let mut ghost = notification("ghost");
        ghost.id = 42;
        assert_matches!(repo.update(ghost).await, Err(ServiceError::NotFound(_)));

        repo.delete(stored.id).await.unwrap();
        assert_eq!(repo.get(stored.id).await.unwrap(), None);
        assert_matches!(repo.delete(stored.id).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn latency_is_applied_per_call() {
        let repo: InMemoryRepository<Notification> =
            InMemoryRepository::with_latency("Notification", Duration::from_millis(20));
        let started = std::time::Instant::now();
        repo.list().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
