use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{form_fields, Form};
use crate::models::{ApplicationMethod, Medication, MedicationEntry, MedicationKind, MedicationRecord};
use crate::validation::{Bound, Field, FieldErrors, FormReader, Rule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationForm {
    pub batch_id: String,
    pub application_date: String,
    pub medication_type: String,
    pub medication_name: String,
    pub dosage: String,
    pub application_method: String,
    pub cost: String,
    pub withdrawal_period_days: String,
    pub next_due_date: String,
    pub notes: String,
}

impl MedicationForm {
    pub fn from_record(record: &MedicationRecord) -> Self {
        Self {
            batch_id: record.batch_id.clone(),
            application_date: record.application_date.to_string(),
            medication_type: record.medication.kind().to_string(),
            medication_name: record.medication_name.clone(),
            dosage: record.dosage.clone(),
            application_method: record.application_method.to_string(),
            cost: record.cost.to_string(),
            withdrawal_period_days: match &record.medication {
                Medication::Vaccine { .. } => "0".to_string(),
                Medication::Antibiotic {
                    withdrawal_period_days,
                }
                | Medication::Vitamin {
                    withdrawal_period_days,
                }
                | Medication::Other {
                    withdrawal_period_days,
                } => withdrawal_period_days
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            },
            next_due_date: record
                .medication
                .next_due_date()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    fn is_vaccine(&self) -> bool {
        matches!(
            MedicationKind::from_str(self.medication_type.trim()),
            Ok(MedicationKind::Vaccine)
        )
    }
}

impl Form for MedicationForm {
    type Output = MedicationEntry;
    type Context = ();

    const ENTITY: &'static str = "medication";

    form_fields! {
        BatchId => batch_id,
        ApplicationDate => application_date,
        MedicationType => medication_type,
        MedicationName => medication_name,
        Dosage => dosage,
        ApplicationMethod => application_method,
        Cost => cost,
        WithdrawalPeriodDays => withdrawal_period_days,
        NextDueDate => next_due_date,
        Notes => notes,
    }

    fn parse(&self, _ctx: &()) -> Result<MedicationEntry, FieldErrors> {
        let mut r = FormReader::new();
        let batch_id = r.text(Field::BatchId, &self.batch_id);
        let application_date = r.date(Field::ApplicationDate, &self.application_date);
        let kind = r.option::<MedicationKind>(Field::MedicationType, &self.medication_type);
        let medication_name = r.text(Field::MedicationName, &self.medication_name);
        let dosage = r.text(Field::Dosage, &self.dosage);
        let application_method =
            r.option::<ApplicationMethod>(Field::ApplicationMethod, &self.application_method);
        let cost = r.decimal(Field::Cost, &self.cost, Bound::NonNegative);
        let notes = r.optional_text(&self.notes);

        let medication = match kind {
            Some(MedicationKind::Vaccine) => {
                if self.next_due_date.trim().is_empty() {
                    r.fail(Field::NextDueDate, Rule::RequiredForVaccines);
                    None
                } else {
                    r.date(Field::NextDueDate, &self.next_due_date)
                        .map(|next_due_date| Medication::Vaccine { next_due_date })
                }
            }
            Some(other) => {
                let days = r.optional_count(
                    Field::WithdrawalPeriodDays,
                    &self.withdrawal_period_days,
                    Bound::NonNegative,
                );
                Some(Medication::non_vaccine(other, days))
            }
            None => None,
        };

        match (
            batch_id,
            application_date,
            medication,
            medication_name,
            dosage,
            application_method,
            cost,
        ) {
            (
                Some(batch_id),
                Some(application_date),
                Some(medication),
                Some(medication_name),
                Some(dosage),
                Some(application_method),
                Some(cost),
            ) if r.errors().is_empty() => Ok(MedicationEntry {
                batch_id,
                application_date,
                medication,
                medication_name,
                dosage,
                application_method,
                cost,
                notes,
            }),
            _ => Err(r.into_errors()),
        }
    }

    fn after_change(&mut self, field: Field, _ctx: &()) {
        if field == Field::MedicationType && self.is_vaccine() {
            self.withdrawal_period_days = "0".to_string();
        }
    }

    fn is_locked(&self, field: Field) -> bool {
        field == Field::WithdrawalPeriodDays && self.is_vaccine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use crate::forms::FormSession;
    use crate::i18n::Locale;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn antibiotic() -> MedicationForm {
        MedicationForm {
            batch_id: "B2025001".into(),
            application_date: "2025-04-05".into(),
            medication_type: "Antibiotic".into(),
            medication_name: "Amoxicillin".into(),
            dosage: "10mg/kg".into(),
            application_method: "Water".into(),
            cost: "350".into(),
            withdrawal_period_days: "7".into(),
            ..Default::default()
        }
    }

    #[test]
    fn vaccine_without_due_date_is_rejected() {
        let mut session = FormSession::new(antibiotic());
        session.change(Field::MedicationType, "Vaccine", &()).unwrap();

        assert_eq!(session.form().withdrawal_period_days, "0");
        assert!(session.form().is_locked(Field::WithdrawalPeriodDays));
        assert_matches!(
            session.change(Field::WithdrawalPeriodDays, "5", &()),
            Err(ServiceError::InvalidOperation(_))
        );

        let errors = session.submit(&()).unwrap_err();
        let err = errors.get(Field::NextDueDate).unwrap();
        assert_eq!(err.rule, Rule::RequiredForVaccines);
        assert_eq!(
            err.message(Locale::En),
            "Next due date is required for vaccines"
        );
    }

    #[test]
    fn vaccine_with_due_date_parses() {
        let mut form = antibiotic();
        form.medication_type = "Vaccine".into();
        form.next_due_date = "2025-04-16".into();
        let entry = form.parse(&()).unwrap();
        assert_eq!(
            entry.medication,
            Medication::Vaccine {
                next_due_date: NaiveDate::from_ymd_opt(2025, 4, 16).unwrap()
            }
        );
        assert_eq!(entry.medication.withdrawal_period_days(), 0);
    }

    #[test]
    fn switching_away_from_vaccine_unlocks() {
        let mut session = FormSession::new(antibiotic());
        session.change(Field::MedicationType, "Vaccine", &()).unwrap();
        session.change(Field::MedicationType, "Vitamin", &()).unwrap();
        session
            .change(Field::WithdrawalPeriodDays, "3", &())
            .unwrap();
        let entry = session.submit(&()).unwrap();
        assert_eq!(entry.medication.withdrawal_period_days(), 3);
        assert_eq!(entry.medication.next_due_date(), None);
    }

    #[test]
    fn free_cost_is_allowed() {
        let mut form = antibiotic();
        form.cost = "0".into();
        form.withdrawal_period_days = String::new();
        let entry = form.parse(&()).unwrap();
        assert_eq!(entry.medication.withdrawal_period_days(), 0);

        form.cost = "-1".into();
        assert_eq!(
            form.validate(&()).get(Field::Cost).unwrap().rule,
            Rule::MustBeNonNegative
        );
    }

    #[test]
    fn prefill_keeps_the_type_tag() {
        let entry = antibiotic().parse(&()).unwrap();
        let record = MedicationRecord::from_entry(9, entry);
        assert_eq!(MedicationForm::from_record(&record), antibiotic());
    }
}
