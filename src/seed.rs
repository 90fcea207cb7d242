//! Sample farm data for demos and development.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::derived;
use crate::errors::ServiceError;
use crate::models::{
    ApplicationMethod, BatchStatus, Breed, ExpenseRecord, ExpenseType, FeedType, FeedingEntry,
    FeedingRecord, InventoryBatch, Medication, MedicationRecord, NewNotification, Notification,
    NotificationKind, PaymentMethod, PaymentStatus, RelatedRef, SaleEntry, SalesRecord,
};
use crate::repositories::Repositories;

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, ServiceError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| ServiceError::InternalError(format!("invalid seed date {y}-{m}-{d}")))
}

fn time(h: u32, m: u32) -> Result<NaiveTime, ServiceError> {
    NaiveTime::from_hms_opt(h, m, 0)
        .ok_or_else(|| ServiceError::InternalError(format!("invalid seed time {h}:{m}")))
}

fn instant(m: u32, d: u32, h: u32, min: u32) -> Result<DateTime<Utc>, ServiceError> {
    Utc.with_ymd_and_hms(2025, m, d, h, min, 0)
        .single()
        .ok_or_else(|| ServiceError::InternalError(format!("invalid seed instant 2025-{m}-{d}")))
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

pub fn batches() -> Result<Vec<InventoryBatch>, ServiceError> {
    let batch = |batch_id: &str,
                 entry_date: NaiveDate,
                 initial_count: u32,
                 current_count: u32,
                 breed: Breed,
                 source: &str,
                 status: BatchStatus,
                 average_weight: Decimal,
                 notes: &str| InventoryBatch {
        id: 0,
        batch_id: batch_id.to_string(),
        entry_date,
        initial_count,
        current_count,
        breed,
        source: source.to_string(),
        status,
        average_weight: Some(average_weight),
        notes: some(notes),
    };
    Ok(vec![
        batch(
            "B2025001",
            date(2025, 4, 1)?,
            5000,
            3850,
            Breed::Cobb500,
            "Local Hatchery",
            BatchStatus::Active,
            dec!(2.2),
            "First batch of the year",
        ),
        batch(
            "B2025002",
            date(2025, 4, 5)?,
            7500,
            5450,
            Breed::Ross308,
            "Premium Poultry Inc.",
            BatchStatus::Active,
            dec!(2.1),
            "Premium quality chicks",
        ),
        batch(
            "B2025003",
            date(2025, 3, 15)?,
            6000,
            0,
            Breed::Cobb500,
            "Local Hatchery",
            BatchStatus::Sold,
            dec!(2.0),
            "Sold to Market A",
        ),
    ])
}

pub fn feeding() -> Result<Vec<FeedingRecord>, ServiceError> {
    #[rustfmt::skip]
    let rows = [
        ("B2025001", date(2025, 4, 1)?, FeedType::Starter, dec!(250), dec!(1.2), time(8, 0)?, some("First feeding for new batch")),
        ("B2025001", date(2025, 4, 2)?, FeedType::Starter, dec!(275), dec!(1.2), time(8, 0)?, None),
        ("B2025002", date(2025, 4, 5)?, FeedType::Starter, dec!(350), dec!(1.2), time(8, 30)?, some("First feeding for batch B2025002")),
        ("B2025001", date(2025, 4, 8)?, FeedType::Grower, dec!(400), dec!(1.15), time(8, 0)?, some("Switched to grower feed")),
    ];
    rows.into_iter()
        .map(|(batch_id, feed_date, feed_type, quantity, cost_per_kg, feed_time, notes)| {
            let total_cost = derived::feeding_total_cost(quantity, cost_per_kg)
                .ok_or_else(|| ServiceError::InternalError(format!("seed feeding total for {batch_id}")))?;
            Ok::<_, ServiceError>(FeedingRecord::from_entry(
                0,
                FeedingEntry {
                    batch_id: batch_id.to_string(),
                    feed_date,
                    feed_type,
                    quantity,
                    cost_per_kg,
                    total_cost,
                    feed_time: Some(feed_time),
                    notes,
                },
            ))
        })
        .collect()
}

pub fn medication() -> Result<Vec<MedicationRecord>, ServiceError> {
    Ok(vec![
        MedicationRecord {
            id: 0,
            batch_id: "B2025001".into(),
            application_date: date(2025, 4, 2)?,
            medication: Medication::Vaccine {
                next_due_date: date(2025, 4, 16)?,
            },
            medication_name: "Newcastle Disease Vaccine".into(),
            dosage: "1 drop per bird".into(),
            application_method: ApplicationMethod::EyeDrop,
            cost: dec!(150),
            notes: some("First vaccination"),
        },
        MedicationRecord {
            id: 0,
            batch_id: "B2025001".into(),
            application_date: date(2025, 4, 5)?,
            medication: Medication::Antibiotic {
                withdrawal_period_days: Some(7),
            },
            medication_name: "Amoxicillin".into(),
            dosage: "10mg/kg".into(),
            application_method: ApplicationMethod::Water,
            cost: dec!(200),
            notes: some("Preventive treatment"),
        },
        MedicationRecord {
            id: 0,
            batch_id: "B2025002".into(),
            application_date: date(2025, 4, 6)?,
            medication: Medication::Vaccine {
                next_due_date: date(2025, 4, 20)?,
            },
            medication_name: "Infectious Bronchitis Vaccine".into(),
            dosage: "1 drop per bird".into(),
            application_method: ApplicationMethod::EyeDrop,
            cost: dec!(180),
            notes: some("First vaccination for batch B2025002"),
        },
    ])
}

pub fn sales() -> Result<Vec<SalesRecord>, ServiceError> {
    #[rustfmt::skip]
    let rows = [
        ("B2025003", date(2025, 4, 5)?, 6000, dec!(12000), dec!(5.5), "Market A", PaymentMethod::BankTransfer, PaymentStatus::Paid, "Complete batch sale"),
        ("B2025001", date(2025, 4, 8)?, 1000, dec!(2200), dec!(5.2), "Local Distributor", PaymentMethod::Cash, PaymentStatus::Paid, "Partial batch sale"),
        ("B2025002", date(2025, 4, 9)?, 2000, dec!(4400), dec!(5.3), "Restaurant Chain", PaymentMethod::Check, PaymentStatus::Pending, "Partial batch sale, payment due in 7 days"),
    ];
    rows.into_iter()
        .map(
            |(batch_id, sale_date, quantity, weight_total, price_per_kg, customer, payment_method, payment_status, notes)| {
                let total_revenue = derived::sales_total_revenue(weight_total, price_per_kg)
                    .ok_or_else(|| ServiceError::InternalError(format!("seed sale total for {batch_id}")))?;
                Ok::<_, ServiceError>(SalesRecord::from_entry(
                    0,
                    SaleEntry {
                        batch_id: batch_id.to_string(),
                        sale_date,
                        quantity,
                        weight_total,
                        price_per_kg,
                        total_revenue,
                        customer_name: some(customer),
                        payment_method,
                        payment_status,
                        notes: some(notes),
                    },
                ))
            },
        )
        .collect()
}

pub fn expenses() -> Result<Vec<ExpenseRecord>, ServiceError> {
    let expense = |expense_date: NaiveDate,
                   expense_type: ExpenseType,
                   amount: Decimal,
                   payment_method: PaymentMethod,
                   description: &str,
                   vendor: Option<&str>,
                   receipt_number: Option<&str>| ExpenseRecord {
        id: 0,
        expense_date,
        expense_type,
        amount,
        payment_method,
        description: description.to_string(),
        vendor: vendor.map(str::to_string),
        receipt_number: receipt_number.map(str::to_string),
    };
    #[rustfmt::skip]
    let records = vec![
        expense(date(2025, 4, 1)?, ExpenseType::Feed, dec!(5000), PaymentMethod::BankTransfer, "Monthly feed supply", Some("Feed Supplier Co."), Some("INV-2025-001")),
        expense(date(2025, 4, 2)?, ExpenseType::Medication, dec!(1200), PaymentMethod::Cash, "Vaccines and antibiotics", Some("Vet Supplies Ltd."), Some("REC-458")),
        expense(date(2025, 4, 3)?, ExpenseType::Utilities, dec!(800), PaymentMethod::BankTransfer, "Electricity bill", Some("Power Company"), Some("BILL-2025-04")),
        expense(date(2025, 4, 5)?, ExpenseType::Labor, dec!(3000), PaymentMethod::BankTransfer, "Staff salaries", None, None),
        expense(date(2025, 4, 7)?, ExpenseType::Equipment, dec!(1500), PaymentMethod::CreditCard, "New feeders and drinkers", Some("Farm Equipment Store"), Some("INV-789")),
    ];
    Ok(records)
}

pub fn notifications() -> Result<Vec<Notification>, ServiceError> {
    #[rustfmt::skip]
    let rows = [
        ("Vaccination Due", "Batch B2025001 is due for Newcastle vaccination tomorrow", NotificationKind::Vaccination, instant(4, 10, 9, 0)?, false, Some(RelatedRef::Batch("B2025001".into()))),
        ("Feed Stock Low", "Feed stock is running low. Current stock: 500 kg", NotificationKind::Alert, instant(4, 9, 14, 30)?, false, None),
        ("Feeding Schedule", "Batch B2025002 feeding schedule updated", NotificationKind::Feeding, instant(4, 8, 16, 45)?, true, Some(RelatedRef::Batch("B2025002".into()))),
        ("Sales Report", "Monthly sales report for March 2025 is now available", NotificationKind::Info, instant(4, 5, 10, 15)?, true, Some(RelatedRef::Report("march-2025".into()))),
        ("Temperature Alert", "High temperature detected in Barn 2. Current: 35°C", NotificationKind::Alert, instant(4, 9, 13, 20)?, false, None),
    ];
    Ok(rows
        .into_iter()
        .map(|(title, message, kind, date, read, related)| {
            let mut notification = Notification::from_new(
                0,
                NewNotification {
                    title: title.to_string(),
                    message: message.to_string(),
                    kind,
                    date,
                    related,
                },
            );
            notification.read = read;
            notification
        })
        .collect())
}

/// Loads every sample record into `repos`.
pub async fn seed(repos: &Repositories) -> Result<(), ServiceError> {
    for batch in batches()? {
        repos.batches.create(batch).await?;
    }
    for record in feeding()? {
        repos.feeding.create(record).await?;
    }
    for record in medication()? {
        repos.medication.create(record).await?;
    }
    for record in sales()? {
        repos.sales.create(record).await?;
    }
    for record in expenses()? {
        repos.expenses.create(record).await?;
    }
    for notification in notifications()? {
        repos.notifications.create(notification).await?;
    }
    info!("sample data loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn derived_totals_match_the_sample_sheets() {
        let totals: Vec<_> = feeding().unwrap().iter().map(|r| r.total_cost).collect();
        assert_eq!(totals, [dec!(300), dec!(330), dec!(420), dec!(460)]);
        let revenue: Vec<_> = sales().unwrap().iter().map(|r| r.total_revenue).collect();
        assert_eq!(revenue, [dec!(66000), dec!(11440), dec!(23320)]);
    }

    #[tokio::test]
    async fn seed_fills_every_repository() {
        let repos = Repositories::in_memory(Duration::ZERO);
        seed(&repos).await.unwrap();
        assert_eq!(repos.batches.list().await.unwrap().len(), 3);
        assert_eq!(repos.feeding.list().await.unwrap().len(), 4);
        assert_eq!(repos.medication.list().await.unwrap().len(), 3);
        assert_eq!(repos.sales.list().await.unwrap().len(), 3);
        assert_eq!(repos.expenses.list().await.unwrap().len(), 5);
        let unread = repos
            .notifications
            .list()
            .await
            .unwrap()
            .iter()
            .filter(|n| !n.read)
            .count();
        assert_eq!(unread, 3);
    }
}
