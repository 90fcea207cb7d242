//! Poultry Ledger Library
//!
//! Record keeping for a broiler farm: inventory batches, feeding,
//! medication, sales and expenses, with a cost/profit calculator, bilingual
//! (Arabic/English) validation messages, reports and notifications.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod derived;
pub mod errors;
pub mod forms;
pub mod i18n;
pub mod metrics;
pub mod models;
pub mod reports;
pub mod repositories;
pub mod seed;
pub mod services;
pub mod validation;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::errors::ServiceError;
use crate::models::Notification;
use crate::reports::ReportService;
use crate::repositories::Repositories;
use crate::services::{
    CalculatorService, ExpenseService, FeedingService, InventoryService, MedicationService,
    NotificationService, SalesService,
};

/// Every service, wired to one set of repositories.
#[derive(Clone)]
pub struct AppServices {
    pub calculator: CalculatorService,
    pub inventory: InventoryService,
    pub feeding: FeedingService,
    pub medication: MedicationService,
    pub sales: SalesService,
    pub expenses: ExpenseService,
    pub notifications: NotificationService,
    pub reports: ReportService,
}

impl AppServices {
    pub fn new(repos: &Repositories) -> Self {
        let inventory = InventoryService::new(repos.batches.clone());
        let sales = SalesService::new(repos.sales.clone(), inventory.clone());
        let expenses = ExpenseService::new(repos.expenses.clone());
        Self {
            calculator: CalculatorService::new(),
            feeding: FeedingService::new(repos.feeding.clone(), inventory.clone()),
            medication: MedicationService::new(repos.medication.clone(), inventory.clone()),
            notifications: NotificationService::new(repos.notifications.clone()),
            reports: ReportService::new(inventory.clone(), sales.clone(), expenses.clone()),
            inventory,
            sales,
            expenses,
        }
    }
}

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub repositories: Repositories,
    pub services: AppServices,
}

impl AppState {
    /// Builds the in-memory state, loading the sample farm when
    /// `seed_sample_data` is set.
    pub async fn in_memory(config: config::AppConfig) -> Result<Self, ServiceError> {
        metrics::register_metrics();
        let repositories = Repositories::in_memory(config.simulated_latency());
        if config.seed_sample_data {
            seed::seed(&repositories).await?;
        }
        let services = AppServices::new(&repositories);
        info!(
            environment = %config.environment,
            seeded = config.seed_sample_data,
            "application state ready"
        );
        Ok(Self {
            config,
            repositories,
            services,
        })
    }

    /// Raises "vaccination due" notifications for vaccines due within the
    /// configured reminder window of `today`.
    pub async fn remind_vaccinations(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, ServiceError> {
        let due = self
            .services
            .medication
            .vaccinations_due(today, self.config.vaccination_reminder_days)
            .await?;
        self.services
            .notifications
            .remind_vaccinations(&due, now)
            .await
    }
}
