use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};
use crate::models::sales::PaymentMethod;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ExpenseType {
    Feed,
    Medication,
    Utilities,
    Labor,
    Equipment,
    Maintenance,
    Other,
}

impl Localized for ExpenseType {
    fn label(&self) -> Label {
        match self {
            ExpenseType::Feed => Label::new("Feed", "علف"),
            ExpenseType::Medication => Label::new("Medication", "أدوية"),
            ExpenseType::Utilities => Label::new("Utilities", "مرافق"),
            ExpenseType::Labor => Label::new("Labor", "عمالة"),
            ExpenseType::Equipment => Label::new("Equipment", "معدات"),
            ExpenseType::Maintenance => Label::new("Maintenance", "صيانة"),
            ExpenseType::Other => Label::new("Other", "أخرى"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub expense_date: NaiveDate,
    pub expense_type: ExpenseType,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub description: String,
    pub vendor: Option<String>,
    pub receipt_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub expense_date: NaiveDate,
    pub expense_type: ExpenseType,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub description: String,
    pub vendor: Option<String>,
    pub receipt_number: Option<String>,
}

impl ExpenseRecord {
    pub fn from_entry(id: i64, entry: ExpenseEntry) -> Self {
        Self {
            id,
            expense_date: entry.expense_date,
            expense_type: entry.expense_type,
            amount: entry.amount,
            payment_method: entry.payment_method,
            description: entry.description,
            vendor: entry.vendor,
            receipt_number: entry.receipt_number,
        }
    }
}
