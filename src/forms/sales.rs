use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{form_fields, Form};
use crate::derived;
use crate::models::batch::find_lookup;
use crate::models::{BatchLookup, PaymentMethod, PaymentStatus, SaleEntry, SalesRecord};
use crate::validation::{Bound, Field, FieldErrors, FormReader, Rule};

/// "Record sale" form. Its context is the list of batches the sale may be
/// drawn from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesForm {
    pub batch_id: String,
    pub sale_date: String,
    pub quantity: String,
    pub weight_total: String,
    pub price_per_kg: String,
    pub customer_name: String,
    pub payment_method: String,
    pub payment_status: String,
    pub notes: String,
}

impl SalesForm {
    /// Running revenue shown while typing.
    pub fn live_total_revenue(&self) -> Option<Decimal> {
        live_revenue(&self.weight_total, &self.price_per_kg)
    }

    /// quantity × batch average weight, when the batch has been weighed.
    fn default_weight(&self, batches: &[BatchLookup]) -> Option<Decimal> {
        let batch = find_lookup(batches, self.batch_id.trim())?;
        let quantity = Decimal::from_str(self.quantity.trim()).ok()?;
        if quantity <= Decimal::ZERO {
            return None;
        }
        derived::default_weight_total(quantity.trunc().to_u32()?, batch.average_weight)
    }
}

fn live_revenue(weight_total: &str, price_per_kg: &str) -> Option<Decimal> {
    let weight = Decimal::from_str(weight_total.trim()).ok()?;
    let price = Decimal::from_str(price_per_kg.trim()).ok()?;
    derived::sales_total_revenue(weight, price)
}

impl Form for SalesForm {
    type Output = SaleEntry;
    type Context = [BatchLookup];

    const ENTITY: &'static str = "sales";

    form_fields! {
        BatchId => batch_id,
        SaleDate => sale_date,
        Quantity => quantity,
        WeightTotal => weight_total,
        PricePerKg => price_per_kg,
        CustomerName => customer_name,
        PaymentMethod => payment_method,
        PaymentStatus => payment_status,
        Notes => notes,
    }

    fn parse(&self, batches: &[BatchLookup]) -> Result<SaleEntry, FieldErrors> {
        let mut r = FormReader::new();
        let batch_id = r.text(Field::BatchId, &self.batch_id);
        let batch = match batch_id.as_deref() {
            Some(id) => {
                let found = find_lookup(batches, id);
                if found.is_none() {
                    r.fail(Field::BatchId, Rule::UnknownOption);
                }
                found
            }
            None => None,
        };
        let sale_date = r.date(Field::SaleDate, &self.sale_date);
        let quantity = r.count(Field::Quantity, &self.quantity, Bound::Positive);
        if let (Some(batch), Some(quantity)) = (batch, quantity) {
            if quantity > batch.current_count {
                r.fail(
                    Field::Quantity,
                    Rule::ExceedsAvailable {
                        available: batch.current_count,
                    },
                );
            }
        }
        let weight_total = r.decimal(Field::WeightTotal, &self.weight_total, Bound::Positive);
        let price_per_kg = r.decimal(Field::PricePerKg, &self.price_per_kg, Bound::Positive);
        let customer_name = r.optional_text(&self.customer_name);
        let payment_method = r.option::<PaymentMethod>(Field::PaymentMethod, &self.payment_method);
        let payment_status = r.option::<PaymentStatus>(Field::PaymentStatus, &self.payment_status);
        let notes = r.optional_text(&self.notes);
        let total_revenue = match (weight_total, price_per_kg) {
            (Some(weight_total), Some(price_per_kg)) => r.derived_total(
                Field::WeightTotal,
                derived::sales_total_revenue(weight_total, price_per_kg),
            ),
            _ => None,
        };

        match (
            batch_id,
            sale_date,
            quantity,
            weight_total,
            price_per_kg,
            payment_method,
            payment_status,
            total_revenue,
        ) {
            (
                Some(batch_id),
                Some(sale_date),
                Some(quantity),
                Some(weight_total),
                Some(price_per_kg),
                Some(payment_method),
                Some(payment_status),
                Some(total_revenue),
            ) if r.errors().is_empty() => Ok(SaleEntry {
                batch_id,
                sale_date,
                quantity,
                weight_total,
                price_per_kg,
                total_revenue,
                customer_name,
                payment_method,
                payment_status,
                notes,
            }),
            _ => Err(r.into_errors()),
        }
    }

    fn after_change(&mut self, field: Field, batches: &[BatchLookup]) {
        if matches!(field, Field::BatchId | Field::Quantity) {
            if let Some(weight) = self.default_weight(batches) {
                self.weight_total = weight.to_string();
            }
        }
    }
}

/// "Edit sale" form. The batch a sale came from is fixed once recorded, so
/// the batch field is locked and no stock check runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesEditForm {
    pub batch_id: String,
    pub sale_date: String,
    pub quantity: String,
    pub weight_total: String,
    pub price_per_kg: String,
    pub customer_name: String,
    pub payment_method: String,
    pub payment_status: String,
    pub notes: String,
}

impl SalesEditForm {
    pub fn from_record(record: &SalesRecord) -> Self {
        Self {
            batch_id: record.batch_id.clone(),
            sale_date: record.sale_date.to_string(),
            quantity: record.quantity.to_string(),
            weight_total: record.weight_total.to_string(),
            price_per_kg: record.price_per_kg.to_string(),
            customer_name: record.customer_name.clone().unwrap_or_default(),
            payment_method: record.payment_method.to_string(),
            payment_status: record.payment_status.to_string(),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    pub fn live_total_revenue(&self) -> Option<Decimal> {
        live_revenue(&self.weight_total, &self.price_per_kg)
    }
}

impl Form for SalesEditForm {
    type Output = SaleEntry;
    type Context = ();

    const ENTITY: &'static str = "sales";

    form_fields! {
        BatchId => batch_id,
        SaleDate => sale_date,
        Quantity => quantity,
        WeightTotal => weight_total,
        PricePerKg => price_per_kg,
        CustomerName => customer_name,
        PaymentMethod => payment_method,
        PaymentStatus => payment_status,
        Notes => notes,
    }

    fn parse(&self, _ctx: &()) -> Result<SaleEntry, FieldErrors> {
        let mut r = FormReader::new();
        let sale_date = r.date(Field::SaleDate, &self.sale_date);
        let quantity = r.count(Field::Quantity, &self.quantity, Bound::Positive);
        let weight_total = r.decimal(Field::WeightTotal, &self.weight_total, Bound::Positive);
        let price_per_kg = r.decimal(Field::PricePerKg, &self.price_per_kg, Bound::Positive);
        let customer_name = r.optional_text(&self.customer_name);
        let payment_method = r.option::<PaymentMethod>(Field::PaymentMethod, &self.payment_method);
        let payment_status = r.option::<PaymentStatus>(Field::PaymentStatus, &self.payment_status);
        let notes = r.optional_text(&self.notes);
        let total_revenue = match (weight_total, price_per_kg) {
            (Some(weight_total), Some(price_per_kg)) => r.derived_total(
                Field::WeightTotal,
                derived::sales_total_revenue(weight_total, price_per_kg),
            ),
            _ => None,
        };

        match (
            sale_date,
            quantity,
            weight_total,
            price_per_kg,
            payment_method,
            payment_status,
            total_revenue,
        ) {
            (
                Some(sale_date),
                Some(quantity),
                Some(weight_total),
                Some(price_per_kg),
                Some(payment_method),
                Some(payment_status),
                Some(total_revenue),
            ) if r.errors().is_empty() => Ok(SaleEntry {
                batch_id: self.batch_id.trim().to_string(),
                sale_date,
                quantity,
                weight_total,
                price_per_kg,
                total_revenue,
                customer_name,
                payment_method,
                payment_status,
                notes,
            }),
            _ => Err(r.into_errors()),
        }
    }

    fn is_locked(&self, field: Field) -> bool {
        field == Field::BatchId
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormSession;
    use crate::i18n::Locale;
    use crate::models::Breed;
    use rust_decimal_macros::dec;

    fn batches() -> Vec<BatchLookup> {
        vec![
            BatchLookup {
                batch_id: "B2025001".into(),
                breed: Breed::Cobb500,
                current_count: 3850,
                average_weight: Some(dec!(2.2)),
            },
            BatchLookup {
                batch_id: "B2025009".into(),
                breed: Breed::Hubbard,
                current_count: 100,
                average_weight: None,
            },
        ]
    }

    fn filled() -> SalesForm {
        SalesForm {
            batch_id: "B2025001".into(),
            sale_date: "2025-04-08".into(),
            quantity: "1000".into(),
            weight_total: "2200".into(),
            price_per_kg: "5.2".into(),
            customer_name: "Local Distributor".into(),
            payment_method: "Cash".into(),
            payment_status: "paid".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn quantity_over_stock_names_available_birds() {
        let mut form = filled();
        form.quantity = "5000".into();
        let errors = form.validate(&batches());
        let err = errors.get(Field::Quantity).unwrap();
        assert_eq!(err.rule, Rule::ExceedsAvailable { available: 3850 });
        assert_eq!(
            err.message(Locale::En),
            "Quantity exceeds available birds (3850)"
        );
    }

    #[test]
    fn weight_defaults_from_average() {
        let mut session = FormSession::new(SalesForm::default());
        session.change(Field::Quantity, "1000", &batches()).unwrap();
        assert_eq!(session.form().weight_total, "");
        session.change(Field::BatchId, "B2025001", &batches()).unwrap();
        assert_eq!(session.form().weight_total, "2200");
        session.change(Field::Quantity, "1500", &batches()).unwrap();
        assert_eq!(session.form().weight_total, "3300");
    }

    #[test]
    fn unweighed_batch_leaves_weight_alone() {
        let mut session = FormSession::new(filled());
        session.change(Field::BatchId, "B2025009", &batches()).unwrap();
        assert_eq!(session.form().weight_total, "2200");
    }

    #[test]
    fn revenue_is_derived() {
        let entry = filled().parse(&batches()).unwrap();
        assert_eq!(entry.total_revenue, dec!(11440));
        assert_eq!(filled().live_total_revenue(), Some(dec!(11440)));
    }

    #[test]
    fn unrepresentable_revenue_is_rejected() {
        let mut form = filled();
        form.weight_total = "100000000000000000000".into();
        form.price_per_kg = "10000000000".into();
        let errors = form.parse(&batches()).unwrap_err();
        assert!(matches!(
            errors.get(Field::WeightTotal).unwrap().rule,
            Rule::OutOfRange { .. }
        ));
    }

    #[test]
    fn unlisted_batch_is_rejected() {
        let mut form = filled();
        form.batch_id = "B1999999".into();
        assert_eq!(
            form.validate(&batches()).get(Field::BatchId).unwrap().rule,
            Rule::UnknownOption
        );
    }

    #[test]
    fn edit_form_locks_the_batch() {
        let entry = filled().parse(&batches()).unwrap();
        let record = SalesRecord::from_entry(1, entry);
        let form = SalesEditForm::from_record(&record);
        assert!(form.is_locked(Field::BatchId));
        let mut session = FormSession::new(form);
        assert!(session.change(Field::BatchId, "B2025009", &()).is_err());
        // stock is not rechecked on edit
        session.change(Field::Quantity, "9000", &()).unwrap();
        assert_eq!(session.submit(&()).unwrap().quantity, 9000);
    }
}
