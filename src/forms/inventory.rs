use serde::{Deserialize, Serialize};

use super::{form_fields, Form};
use crate::models::{BatchStatus, BatchUpdate, Breed, InventoryBatch, NewBatch};
use crate::validation::{Bound, Field, FieldErrors, FormReader, Rule};

/// "Add batch" form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchForm {
    pub batch_id: String,
    pub entry_date: String,
    pub initial_count: String,
    pub breed: String,
    pub source: String,
    pub average_weight: String,
    pub notes: String,
}

impl Form for BatchForm {
    type Output = NewBatch;
    type Context = ();

    const ENTITY: &'static str = "inventory";

    form_fields! {
        BatchId => batch_id,
        EntryDate => entry_date,
        InitialCount => initial_count,
        Breed => breed,
        Source => source,
        AverageWeight => average_weight,
        Notes => notes,
    }

    fn parse(&self, _ctx: &()) -> Result<NewBatch, FieldErrors> {
        let mut r = FormReader::new();
        let batch_id = r.text(Field::BatchId, &self.batch_id);
        let entry_date = r.date(Field::EntryDate, &self.entry_date);
        let initial_count = r.count(Field::InitialCount, &self.initial_count, Bound::Positive);
        let breed = r.option::<Breed>(Field::Breed, &self.breed);
        let source = r.text(Field::Source, &self.source);
        let average_weight =
            r.optional_decimal(Field::AverageWeight, &self.average_weight, Bound::Positive);
        let notes = r.optional_text(&self.notes);

        match (batch_id, entry_date, initial_count, breed, source) {
            (Some(batch_id), Some(entry_date), Some(initial_count), Some(breed), Some(source))
                if r.errors().is_empty() =>
            {
                Ok(NewBatch {
                    batch_id,
                    entry_date,
                    initial_count,
                    breed,
                    source,
                    average_weight,
                    notes,
                })
            }
            _ => Err(r.into_errors()),
        }
    }
}

/// "Edit batch" form. Adds the live count and status, and checks that the
/// live count never exceeds the initial count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchEditForm {
    pub batch_id: String,
    pub entry_date: String,
    pub initial_count: String,
    pub current_count: String,
    pub breed: String,
    pub source: String,
    pub status: String,
    pub average_weight: String,
    pub notes: String,
}

impl BatchEditForm {
    /// Prefills the form from a stored batch.
    pub fn from_record(batch: &InventoryBatch) -> Self {
        Self {
            batch_id: batch.batch_id.clone(),
            entry_date: batch.entry_date.to_string(),
            initial_count: batch.initial_count.to_string(),
            current_count: batch.current_count.to_string(),
            breed: batch.breed.to_string(),
            source: batch.source.clone(),
            status: batch.status.to_string(),
            average_weight: batch
                .average_weight
                .map(|w| w.to_string())
                .unwrap_or_default(),
            notes: batch.notes.clone().unwrap_or_default(),
        }
    }
}

impl Form for BatchEditForm {
    type Output = BatchUpdate;
    type Context = ();

    const ENTITY: &'static str = "inventory";

    form_fields! {
        BatchId => batch_id,
        EntryDate => entry_date,
        InitialCount => initial_count,
        CurrentCount => current_count,
        Breed => breed,
        Source => source,
        Status => status,
        AverageWeight => average_weight,
        Notes => notes,
    }

    fn parse(&self, _ctx: &()) -> Result<BatchUpdate, FieldErrors> {
        let mut r = FormReader::new();
        let batch_id = r.text(Field::BatchId, &self.batch_id);
        let entry_date = r.date(Field::EntryDate, &self.entry_date);
        let initial_count = r.count(Field::InitialCount, &self.initial_count, Bound::Positive);
        let current_count = r.count(Field::CurrentCount, &self.current_count, Bound::NonNegative);
        let breed = r.option::<Breed>(Field::Breed, &self.breed);
        let source = r.text(Field::Source, &self.source);
        let status = r.option::<BatchStatus>(Field::Status, &self.status);
        let average_weight =
            r.optional_decimal(Field::AverageWeight, &self.average_weight, Bound::Positive);
        let notes = r.optional_text(&self.notes);

        if let (Some(initial), Some(current)) = (initial_count, current_count) {
            if current > initial {
                r.fail(Field::CurrentCount, Rule::ExceedsInitialCount);
            }
        }

        match (
            batch_id,
            entry_date,
            initial_count,
            current_count,
            breed,
            source,
            status,
        ) {
            (
                Some(batch_id),
                Some(entry_date),
                Some(initial_count),
                Some(current_count),
                Some(breed),
                Some(source),
                Some(status),
            ) if r.errors().is_empty() => Ok(BatchUpdate {
                batch_id,
                entry_date,
                initial_count,
                current_count,
                breed,
                source,
                status,
                average_weight,
                notes,
            }),
            _ => Err(r.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn edit_form() -> BatchEditForm {
        BatchEditForm {
            batch_id: "B2025001".into(),
            entry_date: "2025-04-01".into(),
            initial_count: "5000".into(),
            current_count: "3850".into(),
            breed: "Cobb 500".into(),
            source: "Local Hatchery".into(),
            status: "active".into(),
            average_weight: "2.2".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn add_form_requires_core_fields() {
        let errors = BatchForm::default().validate(&());
        for field in [
            Field::BatchId,
            Field::EntryDate,
            Field::InitialCount,
            Field::Breed,
            Field::Source,
        ] {
            assert_eq!(errors.get(field).unwrap().rule, Rule::Required, "{field}");
        }
        assert!(!errors.contains(Field::AverageWeight));
        assert!(!errors.contains(Field::Notes));
    }

    #[test]
    fn edit_form_parses_a_consistent_batch() {
        let update = edit_form().parse(&()).unwrap();
        assert_eq!(update.current_count, 3850);
        assert_eq!(update.status, BatchStatus::Active);
        assert_eq!(update.average_weight, Some(dec!(2.2)));
        assert_eq!(update.notes, None);
    }

    #[test]
    fn live_count_cannot_exceed_initial() {
        let mut form = edit_form();
        form.current_count = "5001".into();
        let errors = form.validate(&());
        assert_eq!(
            errors.get(Field::CurrentCount).unwrap().rule,
            Rule::ExceedsInitialCount
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_live_birds_is_allowed() {
        let mut form = edit_form();
        form.current_count = "0".into();
        form.status = "sold".into();
        assert!(form.validate(&()).is_empty());
    }

    #[test]
    fn prefill_round_trips() {
        let update = edit_form().parse(&()).unwrap();
        let batch = InventoryBatch {
            id: 1,
            batch_id: update.batch_id.clone(),
            entry_date: update.entry_date,
            initial_count: update.initial_count,
            current_count: update.current_count,
            breed: update.breed,
            source: update.source.clone(),
            status: update.status,
            average_weight: update.average_weight,
            notes: None,
        };
        assert_eq!(BatchEditForm::from_record(&batch), edit_form());
    }
}
