//! Grouping helpers behind the report charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::models::batch::mortality_rate;
use crate::models::{BatchStatus, InventoryBatch};

/// One slice of a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal<K> {
    pub category: K,
    pub value: Decimal,
}

/// One point of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTotal {
    pub date: NaiveDate,
    pub value: Decimal,
}

pub(crate) fn overflow(what: &str) -> ServiceError {
    ServiceError::InvalidInput(format!("{what} is too large to compute"))
}

/// Sums every value, failing instead of overflowing.
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal, ServiceError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or_else(|| overflow(what))
}

/// Sums `value` per `key`, ordered by key.
pub fn sum_by_category<T, K, FK, FV>(
    items: &[T],
    key: FK,
    value: FV,
) -> Result<Vec<CategoryTotal<K>>, ServiceError>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> Decimal,
{
    let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();
    for item in items {
        let total = totals.entry(key(item)).or_default();
        *total = total
            .checked_add(value(item))
            .ok_or_else(|| overflow("category total"))?;
    }
    Ok(totals
        .into_iter()
        .map(|(category, value)| CategoryTotal { category, value })
        .collect())
}

/// Sums `value` per day, oldest first.
pub fn sum_by_date<T, FD, FV>(items: &[T], date: FD, value: FV) -> Result<Vec<DateTotal>, ServiceError>
where
    FD: Fn(&T) -> NaiveDate,
    FV: Fn(&T) -> Decimal,
{
    Ok(sum_by_category(items, date, value)?
        .into_iter()
        .map(|t| DateTotal {
            date: t.category,
            value: t.value,
        })
        .collect())
}

/// Per-batch row of the inventory report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub batch_id: String,
    pub status: BatchStatus,
    pub initial_count: u32,
    pub current_count: u32,
    pub reduction: u32,
    pub mortality_rate: Decimal,
}

/// Totals across every batch on the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRollup {
    pub batch_count: usize,
    pub total_initial: u64,
    pub total_current: u64,
    pub total_reduction: u64,
    /// Losses of batches still on the farm over all birds ever entered.
    /// Sold batches count toward the denominator only.
    pub mortality_rate: Decimal,
    pub batches: Vec<BatchRow>,
}

pub fn fleet_rollup(batches: &[InventoryBatch]) -> FleetRollup {
    let total_initial: u64 = batches.iter().map(|b| u64::from(b.initial_count)).sum();
    let total_current: u64 = batches.iter().map(|b| u64::from(b.current_count)).sum();
    let total_reduction: u64 = batches.iter().map(|b| u64::from(b.reduction())).sum();
    let losses: u64 = batches
        .iter()
        .filter(|b| b.status != BatchStatus::Sold)
        .map(|b| u64::from(b.reduction()))
        .sum();

    FleetRollup {
        batch_count: batches.len(),
        total_initial,
        total_current,
        total_reduction,
        mortality_rate: Decimal::from(losses) / Decimal::from(total_initial.max(1))
            * Decimal::ONE_HUNDRED,
        batches: batches
            .iter()
            .map(|b| BatchRow {
                batch_id: b.batch_id.clone(),
                status: b.status,
                initial_count: b.initial_count,
                current_count: b.current_count,
                reduction: b.reduction(),
                mortality_rate: mortality_rate(b.initial_count, b.current_count),
            })
            .collect(),
    }
}
