use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::{checked_sum, overflow};
use crate::errors::ServiceError;
use crate::models::{ExpenseRecord, ExpenseType, InventoryBatch, SalesRecord};

/// Per-bird efficiency figures. Every denominator is clamped to at least
/// one bird so an empty window reads as zero instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub birds_sold: u64,
    /// kg per sold bird
    pub average_weight_per_bird: Decimal,
    pub average_revenue_per_bird: Decimal,
    /// feed expenses over birds ever entered
    pub feed_cost_per_bird: Decimal,
    pub profit_per_bird: Decimal,
}

/// Totals too large for a `Decimal` yield [`ServiceError::InvalidInput`].
pub fn performance_report(
    sales: &[SalesRecord],
    expenses: &[ExpenseRecord],
    batches: &[InventoryBatch],
) -> Result<PerformanceReport, ServiceError> {
    let birds_sold: u64 = sales.iter().map(|s| u64::from(s.quantity)).sum();
    let sold = Decimal::from(birds_sold.max(1));
    let entered = Decimal::from(
        batches
            .iter()
            .map(|b| u64::from(b.initial_count))
            .sum::<u64>()
            .max(1),
    );

    let weight = checked_sum(sales.iter().map(|s| s.weight_total), "total weight")?;
    let revenue = checked_sum(sales.iter().map(|s| s.total_revenue), "total revenue")?;
    let all_expenses = checked_sum(expenses.iter().map(|e| e.amount), "total expenses")?;
    let feed = checked_sum(
        expenses
            .iter()
            .filter(|e| e.expense_type == ExpenseType::Feed)
            .map(|e| e.amount),
        "feed expenses",
    )?;
    let profit = revenue
        .checked_sub(all_expenses)
        .ok_or_else(|| overflow("net profit"))?;
    let per_bird = |total: Decimal, birds: Decimal, what: &str| {
        total.checked_div(birds).ok_or_else(|| overflow(what))
    };

    Ok(PerformanceReport {
        birds_sold,
        average_weight_per_bird: per_bird(weight, sold, "weight per bird")?,
        average_revenue_per_bird: per_bird(revenue, sold, "revenue per bird")?,
        feed_cost_per_bird: per_bird(feed, entered, "feed cost per bird")?,
        profit_per_bird: per_bird(profit, sold, "profit per bird")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    #[test]
    fn empty_window_reads_zero() {
        let report = performance_report(&[], &[], &[]).unwrap();
        assert_eq!(report.birds_sold, 0);
        assert_eq!(report.average_weight_per_bird, Decimal::ZERO);
        assert_eq!(report.profit_per_bird, Decimal::ZERO);
    }

    #[test]
    fn expenses_beyond_decimal_range_are_rejected() {
        let bill = ExpenseRecord {
            id: 1,
            expense_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            expense_type: ExpenseType::Feed,
            amount: Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0),
            payment_method: PaymentMethod::Cash,
            description: "feed".into(),
            vendor: None,
            receipt_number: None,
        };
        let second = ExpenseRecord { id: 2, ..bill.clone() };
        assert_matches!(
            performance_report(&[], &[bill, second], &[]),
            Err(ServiceError::InvalidInput(_))
        );
    }
}
