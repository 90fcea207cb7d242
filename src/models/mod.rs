//! Typed farm records and the option sets their forms offer.

pub mod batch;
pub mod expense;
pub mod feeding;
pub mod medication;
pub mod notification;
pub mod sales;

pub use batch::{BatchLookup, BatchStatus, BatchUpdate, Breed, InventoryBatch, NewBatch};
pub use expense::{ExpenseEntry, ExpenseRecord, ExpenseType};
pub use feeding::{FeedType, FeedingEntry, FeedingRecord};
pub use medication::{
    ApplicationMethod, Medication, MedicationEntry, MedicationKind, MedicationRecord,
};
pub use notification::{NewNotification, Notification, NotificationKind, RelatedRef};
pub use sales::{PaymentMethod, PaymentStatus, SaleEntry, SalesRecord};
