use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{form_fields, Form};
use crate::derived;
use crate::models::{FeedType, FeedingEntry, FeedingRecord};
use crate::validation::{Bound, Field, FieldErrors, FormReader};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingForm {
    pub batch_id: String,
    pub feed_date: String,
    pub feed_type: String,
    pub quantity: String,
    pub cost_per_kg: String,
    pub feed_time: String,
    pub notes: String,
}

impl FeedingForm {
    pub fn from_record(record: &FeedingRecord) -> Self {
        Self {
            batch_id: record.batch_id.clone(),
            feed_date: record.feed_date.to_string(),
            feed_type: record.feed_type.to_string(),
            quantity: record.quantity.to_string(),
            cost_per_kg: record.cost_per_kg.to_string(),
            feed_time: record
                .feed_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    /// Running total shown under the form while typing: quantity times
    /// cost per kg once both read as numbers.
    pub fn live_total_cost(&self) -> Option<Decimal> {
        let quantity = Decimal::from_str(self.quantity.trim()).ok()?;
        let cost_per_kg = Decimal::from_str(self.cost_per_kg.trim()).ok()?;
        derived::feeding_total_cost(quantity, cost_per_kg)
    }
}

impl Form for FeedingForm {
    type Output = FeedingEntry;
    type Context = ();

    const ENTITY: &'static str = "feeding";

    form_fields! {
        BatchId => batch_id,
        FeedDate => feed_date,
        FeedType => feed_type,
        Quantity => quantity,
        CostPerKg => cost_per_kg,
        FeedTime => feed_time,
        Notes => notes,
    }

    fn parse(&self, _ctx: &()) -> Result<FeedingEntry, FieldErrors> {
        let mut r = FormReader::new();
        let batch_id = r.text(Field::BatchId, &self.batch_id);
        let feed_date = r.date(Field::FeedDate, &self.feed_date);
        let feed_type = r.option::<FeedType>(Field::FeedType, &self.feed_type);
        let quantity = r.decimal(Field::Quantity, &self.quantity, Bound::Positive);
        let cost_per_kg = r.decimal(Field::CostPerKg, &self.cost_per_kg, Bound::Positive);
        let feed_time = r.optional_time(Field::FeedTime, &self.feed_time);
        let notes = r.optional_text(&self.notes);
        let total_cost = match (quantity, cost_per_kg) {
            (Some(quantity), Some(cost_per_kg)) => r.derived_total(
                Field::Quantity,
                derived::feeding_total_cost(quantity, cost_per_kg),
            ),
            _ => None,
        };

        match (batch_id, feed_date, feed_type, quantity, cost_per_kg, total_cost) {
            (
                Some(batch_id),
                Some(feed_date),
                Some(feed_type),
                Some(quantity),
                Some(cost_per_kg),
                Some(total_cost),
            ) if r.errors().is_empty() => {
                Ok(FeedingEntry {
                    batch_id,
                    feed_date,
                    feed_type,
                    quantity,
                    cost_per_kg,
                    total_cost,
                    feed_time,
                    notes,
                })
            }
            _ => Err(r.into_errors()),
        }
    }
}
