//! Financial, inventory and performance reports over a reporting window.

pub mod aggregation;
pub mod financial;
pub mod inventory;
pub mod performance;
pub mod time_range;

pub use aggregation::{checked_sum, sum_by_category, sum_by_date, CategoryTotal, DateTotal, FleetRollup};
pub use financial::{FinancialPoint, FinancialReport};
pub use inventory::InventoryReport;
pub use performance::PerformanceReport;
pub use time_range::TimeRange;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::i18n::{Label, Localized};
use crate::services::{ExpenseService, InventoryService, SalesService};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportType {
    Financial,
    Inventory,
    Performance,
}

impl Localized for ReportType {
    fn label(&self) -> Label {
        match self {
            ReportType::Financial => Label::new("Financial Report", "التقرير المالي"),
            ReportType::Inventory => Label::new("Inventory Report", "تقرير المخزون"),
            ReportType::Performance => Label::new("Performance Report", "تقرير الأداء"),
        }
    }
}

/// Any of the three reports, tagged by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report_type", rename_all = "lowercase")]
pub enum Report {
    Financial(FinancialReport),
    Inventory(InventoryReport),
    Performance(PerformanceReport),
}

/// Reads the stored records and builds reports for a window ending on
/// `today`.
#[derive(Clone)]
pub struct ReportService {
    inventory: InventoryService,
    sales: SalesService,
    expenses: ExpenseService,
}

impl ReportService {
    pub fn new(inventory: InventoryService, sales: SalesService, expenses: ExpenseService) -> Self {
        Self {
            inventory,
            sales,
            expenses,
        }
    }

    #[instrument(skip(self))]
    pub async fn financial(
        &self,
        range: TimeRange,
        today: NaiveDate,
    ) -> Result<FinancialReport, ServiceError> {
        let mut sales = self.sales.list().await?;
        let mut expenses = self.expenses.list().await?;
        sales.retain(|s| range.contains(s.sale_date, today));
        expenses.retain(|e| range.contains(e.expense_date, today));
        debug!(sales = sales.len(), expenses = expenses.len(), "financial report inputs");
        financial::financial_report(&sales, &expenses)
    }

    #[instrument(skip(self))]
    pub async fn inventory(&self) -> Result<InventoryReport, ServiceError> {
        let batches = self.inventory.list().await?;
        inventory::inventory_report(&batches)
    }

    #[instrument(skip(self))]
    pub async fn performance(
        &self,
        range: TimeRange,
        today: NaiveDate,
    ) -> Result<PerformanceReport, ServiceError> {
        let mut sales = self.sales.list().await?;
        let mut expenses = self.expenses.list().await?;
        sales.retain(|s| range.contains(s.sale_date, today));
        expenses.retain(|e| range.contains(e.expense_date, today));
        let batches = self.inventory.list().await?;
        debug!(sales = sales.len(), expenses = expenses.len(), "performance report inputs");
        performance::performance_report(&sales, &expenses, &batches)
    }

    pub async fn build(
        &self,
        report_type: ReportType,
        range: TimeRange,
        today: NaiveDate,
    ) -> Result<Report, ServiceError> {
        Ok(match report_type {
            ReportType::Financial => Report::Financial(self.financial(range, today).await?),
            ReportType::Inventory => Report::Inventory(self.inventory().await?),
            ReportType::Performance => Report::Performance(self.performance(range, today).await?),
        })
    }
}
