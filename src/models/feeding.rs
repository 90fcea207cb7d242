use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum FeedType {
    #[serde(rename = "Starter Feed")]
    #[strum(serialize = "Starter Feed")]
    Starter,
    #[serde(rename = "Grower Feed")]
    #[strum(serialize = "Grower Feed")]
    Grower,
    #[serde(rename = "Finisher Feed")]
    #[strum(serialize = "Finisher Feed")]
    Finisher,
}

impl Localized for FeedType {
    fn label(&self) -> Label {
        match self {
            FeedType::Starter => Label::new("Starter Feed", "علف بادئ"),
            FeedType::Grower => Label::new("Grower Feed", "علف نامي"),
            FeedType::Finisher => Label::new("Finisher Feed", "علف ناهي"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingRecord {
    pub id: i64,
    pub batch_id: String,
    pub feed_date: NaiveDate,
    pub feed_type: FeedType,
    /// kg
    pub quantity: Decimal,
    pub cost_per_kg: Decimal,
    pub total_cost: Decimal,
    pub feed_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// Validated feeding form. `total_cost` is derived from quantity and unit
/// cost while parsing, never read from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingEntry {
    pub batch_id: String,
    pub feed_date: NaiveDate,
    pub feed_type: FeedType,
    pub quantity: Decimal,
    pub cost_per_kg: Decimal,
    pub total_cost: Decimal,
    pub feed_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl FeedingRecord {
    pub fn from_entry(id: i64, entry: FeedingEntry) -> Self {
        Self {
            id,
            batch_id: entry.batch_id,
            feed_date: entry.feed_date,
            feed_type: entry.feed_type,
            quantity: entry.quantity,
            cost_per_kg: entry.cost_per_kg,
            total_cost: entry.total_cost,
            feed_time: entry.feed_time,
            notes: entry.notes,
        }
    }
}
