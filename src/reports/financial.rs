use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::{
    checked_sum, overflow, sum_by_category, sum_by_date, CategoryTotal, DateTotal,
};
use crate::errors::ServiceError;
use crate::models::{ExpenseRecord, ExpenseType, PaymentStatus, SalesRecord};

/// Revenue, expenses and profit for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// percent of revenue; zero when there is no revenue
    pub profit_margin: Decimal,
    pub series: Vec<FinancialPoint>,
    pub expenses_by_type: Vec<CategoryTotal<ExpenseType>>,
    pub revenue_by_payment_status: Vec<CategoryTotal<PaymentStatus>>,
}

/// Builds the report from records already narrowed to the reporting window.
/// Totals too large for a `Decimal` yield [`ServiceError::InvalidInput`].
pub fn financial_report(
    sales: &[SalesRecord],
    expenses: &[ExpenseRecord],
) -> Result<FinancialReport, ServiceError> {
    let total_revenue = checked_sum(sales.iter().map(|s| s.total_revenue), "total revenue")?;
    let total_expenses = checked_sum(expenses.iter().map(|e| e.amount), "total expenses")?;
    let net_profit = total_revenue
        .checked_sub(total_expenses)
        .ok_or_else(|| overflow("net profit"))?;
    let profit_margin = if total_revenue > Decimal::ZERO {
        net_profit
            .checked_div(total_revenue)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| overflow("profit margin"))?
    } else {
        Decimal::ZERO
    };

    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for DateTotal { date, value } in sum_by_date(sales, |s| s.sale_date, |s| s.total_revenue)? {
        days.entry(date).or_default().0 = value;
    }
    for DateTotal { date, value } in sum_by_date(expenses, |e| e.expense_date, |e| e.amount)? {
        days.entry(date).or_default().1 = value;
    }
    let series = days
        .into_iter()
        .map(|(date, (revenue, expenses))| {
            Ok(FinancialPoint {
                date,
                revenue,
                expenses,
                profit: revenue
                    .checked_sub(expenses)
                    .ok_or_else(|| overflow("daily profit"))?,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    Ok(FinancialReport {
        total_revenue,
        total_expenses,
        net_profit,
        profit_margin,
        series,
        expenses_by_type: sum_by_category(expenses, |e| e.expense_type, |e| e.amount)?,
        revenue_by_payment_status: sum_by_category(
            sales,
            |s| s.payment_status,
            |s| s.total_revenue,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, SaleEntry};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn no_revenue_means_zero_margin() {
        let report = financial_report(&[], &[]).unwrap();
        assert_eq!(report.profit_margin, Decimal::ZERO);
        assert!(report.series.is_empty());
        assert!(report.expenses_by_type.is_empty());
    }

    #[test]
    fn tiny_revenue_against_huge_expenses_is_rejected() {
        let sale = SalesRecord::from_entry(
            1,
            SaleEntry {
                batch_id: "B1".into(),
                sale_date: day(5),
                quantity: 1,
                weight_total: dec!(0.0001),
                price_per_kg: dec!(0.0001),
                total_revenue: dec!(0.00000001),
                customer_name: None,
                payment_method: PaymentMethod::Cash,
                payment_status: PaymentStatus::Paid,
                notes: None,
            },
        );
        let expense = ExpenseRecord {
            id: 1,
            expense_date: day(5),
            expense_type: ExpenseType::Labor,
            amount: Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0),
            payment_method: PaymentMethod::Cash,
            description: "x".into(),
            vendor: None,
            receipt_number: None,
        };
        assert_matches!(
            financial_report(&[sale], &[expense]),
            Err(ServiceError::InvalidInput(_))
        );
    }
}
