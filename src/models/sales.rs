use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};

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
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Bank Transfer")]
    #[strum(serialize = "Bank Transfer")]
    BankTransfer,
    Check,
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
}

impl Localized for PaymentMethod {
    fn label(&self) -> Label {
        match self {
            PaymentMethod::Cash => Label::new("Cash", "نقدي"),
            PaymentMethod::BankTransfer => Label::new("Bank Transfer", "تحويل بنكي"),
            PaymentMethod::Check => Label::new("Check", "شيك"),
            PaymentMethod::CreditCard => Label::new("Credit Card", "بطاقة ائتمان"),
        }
    }
}

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl Localized for PaymentStatus {
    fn label(&self) -> Label {
        match self {
            PaymentStatus::Paid => Label::new("Paid", "مدفوع"),
            PaymentStatus::Pending => Label::new("Pending", "معلق"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: i64,
    pub batch_id: String,
    pub sale_date: NaiveDate,
    /// birds sold
    pub quantity: u32,
    /// kg
    pub weight_total: Decimal,
    pub price_per_kg: Decimal,
    pub total_revenue: Decimal,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

/// Validated sales form. `total_revenue` is derived from weight and price
/// while parsing, never read from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEntry {
    pub batch_id: String,
    pub sale_date: NaiveDate,
    pub quantity: u32,
    pub weight_total: Decimal,
    pub price_per_kg: Decimal,
    pub total_revenue: Decimal,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

impl SalesRecord {
    pub fn from_entry(id: i64, entry: SaleEntry) -> Self {
        Self {
            id,
            batch_id: entry.batch_id,
            sale_date: entry.sale_date,
            quantity: entry.quantity,
            weight_total: entry.weight_total,
            price_per_kg: entry.price_per_kg,
            total_revenue: entry.total_revenue,
            customer_name: entry.customer_name,
            payment_method: entry.payment_method,
            payment_status: entry.payment_status,
            notes: entry.notes,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}
