use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};

/// The medication type option as picked in the form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum MedicationKind {
    Vaccine,
    Antibiotic,
    Vitamin,
    Other,
}

impl Localized for MedicationKind {
    fn label(&self) -> Label {
        match self {
            MedicationKind::Vaccine => Label::new("Vaccine", "لقاح"),
            MedicationKind::Antibiotic => Label::new("Antibiotic", "مضاد حيوي"),
            MedicationKind::Vitamin => Label::new("Vitamin", "فيتامين"),
            MedicationKind::Other => Label::new("Other", "أخرى"),
        }
    }
}

/// Type-specific part of a medication record.
///
/// A vaccine always has a next due date and never a withdrawal period; the
/// other kinds carry an optional withdrawal period and no due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "medication_type")]
pub enum Medication {
    Vaccine {
        next_due_date: NaiveDate,
    },
    Antibiotic {
        withdrawal_period_days: Option<u32>,
    },
    Vitamin {
        withdrawal_period_days: Option<u32>,
    },
    Other {
        withdrawal_period_days: Option<u32>,
    },
}

impl Medication {
    pub fn kind(&self) -> MedicationKind {
        match self {
            Medication::Vaccine { .. } => MedicationKind::Vaccine,
            Medication::Antibiotic { .. } => MedicationKind::Antibiotic,
            Medication::Vitamin { .. } => MedicationKind::Vitamin,
            Medication::Other { .. } => MedicationKind::Other,
        }
    }

    pub fn withdrawal_period_days(&self) -> u32 {
        match self {
            Medication::Vaccine { .. } => 0,
            Medication::Antibiotic {
                withdrawal_period_days,
            }
            | Medication::Vitamin {
                withdrawal_period_days,
            }
            | Medication::Other {
                withdrawal_period_days,
            } => withdrawal_period_days.unwrap_or(0),
        }
    }

    pub fn next_due_date(&self) -> Option<NaiveDate> {
        match self {
            Medication::Vaccine { next_due_date } => Some(*next_due_date),
            _ => None,
        }
    }

    pub(crate) fn non_vaccine(kind: MedicationKind, withdrawal_period_days: Option<u32>) -> Self {
        match kind {
            MedicationKind::Antibiotic => Medication::Antibiotic {
                withdrawal_period_days,
            },
            MedicationKind::Vitamin => Medication::Vitamin {
                withdrawal_period_days,
            },
            // a vaccine without a due date never reaches here
            MedicationKind::Other | MedicationKind::Vaccine => Medication::Other {
                withdrawal_period_days,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: i64,
    pub batch_id: String,
    pub application_date: NaiveDate,
    #[serde(flatten)]
    pub medication: Medication,
    pub medication_name: String,
    pub dosage: String,
    pub application_method: ApplicationMethod,
    pub cost: Decimal,
    pub notes: Option<String>,
}

impl MedicationRecord {
    pub fn from_entry(id: i64, entry: MedicationEntry) -> Self {
        Self {
            id,
            batch_id: entry.batch_id,
            application_date: entry.application_date,
            medication: entry.medication,
            medication_name: entry.medication_name,
            dosage: entry.dosage,
            application_method: entry.application_method,
            cost: entry.cost,
            notes: entry.notes,
        }
    }
}

/// Validated medication form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub batch_id: String,
    pub application_date: NaiveDate,
    pub medication: Medication,
    pub medication_name: String,
    pub dosage: String,
    pub application_method: ApplicationMethod,
    pub cost: Decimal,
    pub notes: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ApplicationMethod {
    Water,
    Feed,
    Injection,
    Spray,
    #[serde(rename = "Eye drop")]
    #[strum(serialize = "Eye drop")]
    EyeDrop,
}

impl Localized for ApplicationMethod {
    fn label(&self) -> Label {
        match self {
            ApplicationMethod::Water => Label::new("Water", "ماء الشرب"),
            ApplicationMethod::Feed => Label::new("Feed", "العلف"),
            ApplicationMethod::Injection => Label::new("Injection", "حقن"),
            ApplicationMethod::Spray => Label::new("Spray", "رش"),
            ApplicationMethod::EyeDrop => Label::new("Eye drop", "قطرة عين"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vaccines_never_withdraw() {
        let due = NaiveDate::from_ymd_opt(2025, 4, 16).unwrap();
        let vaccine = Medication::Vaccine { next_due_date: due };
        assert_eq!(vaccine.withdrawal_period_days(), 0);
        assert_eq!(vaccine.next_due_date(), Some(due));
        assert_eq!(vaccine.kind(), MedicationKind::Vaccine);

        let antibiotic = Medication::Antibiotic {
            withdrawal_period_days: Some(7),
        };
        assert_eq!(antibiotic.withdrawal_period_days(), 7);
        assert_eq!(antibiotic.next_due_date(), None);
    }

    #[test]
    fn record_serializes_type_tag_inline() {
        let record = MedicationRecord {
            id: 2,
            batch_id: "B2025001".into(),
            application_date: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
            medication: Medication::Antibiotic {
                withdrawal_period_days: Some(7),
            },
            medication_name: "Amoxicillin".into(),
            dosage: "10mg/kg".into(),
            application_method: ApplicationMethod::Water,
            cost: rust_decimal_macros::dec!(350),
            notes: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["medication_type"], "Antibiotic");
        assert_eq!(json["withdrawal_period_days"], 7);
        assert_eq!(json["application_method"], "Water");

        let back: MedicationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
