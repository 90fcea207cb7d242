use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Locale, Localized};

/// Broiler breeds offered by the inventory forms.
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
pub enum Breed {
    #[serde(rename = "Cobb 500")]
    #[strum(serialize = "Cobb 500")]
    Cobb500,
    #[serde(rename = "Ross 308")]
    #[strum(serialize = "Ross 308")]
    Ross308,
    Hubbard,
    #[serde(rename = "Arbor Acres")]
    #[strum(serialize = "Arbor Acres")]
    ArborAcres,
}

impl Localized for Breed {
    fn label(&self) -> Label {
        match self {
            Breed::Cobb500 => Label::new("Cobb 500", "كوب 500"),
            Breed::Ross308 => Label::new("Ross 308", "روس 308"),
            Breed::Hubbard => Label::new("Hubbard", "هابارد"),
            Breed::ArborAcres => Label::new("Arbor Acres", "أربور إيكرز"),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum BatchStatus {
    #[default]
    Active,
    Sold,
    Dead,
}

impl Localized for BatchStatus {
    fn label(&self) -> Label {
        match self {
            BatchStatus::Active => Label::new("Active", "نشط"),
            BatchStatus::Sold => Label::new("Sold", "مباع"),
            BatchStatus::Dead => Label::new("Dead", "نافق"),
        }
    }
}

/// A cohort of birds entered into inventory on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryBatch {
    pub id: i64,
    pub batch_id: String,
    pub entry_date: NaiveDate,
    pub initial_count: u32,
    pub current_count: u32,
    pub breed: Breed,
    pub source: String,
    pub status: BatchStatus,
    /// kg per bird, when weighed
    pub average_weight: Option<Decimal>,
    pub notes: Option<String>,
}

impl InventoryBatch {
    pub fn from_new(id: i64, new: NewBatch) -> Self {
        Self {
            id,
            batch_id: new.batch_id,
            entry_date: new.entry_date,
            initial_count: new.initial_count,
            current_count: new.initial_count,
            breed: new.breed,
            source: new.source,
            status: BatchStatus::Active,
            average_weight: new.average_weight,
            notes: new.notes,
        }
    }

    pub fn apply(&mut self, update: BatchUpdate) {
        self.batch_id = update.batch_id;
        self.entry_date = update.entry_date;
        self.initial_count = update.initial_count;
        self.current_count = update.current_count;
        self.breed = update.breed;
        self.source = update.source;
        self.status = update.status;
        self.average_weight = update.average_weight;
        self.notes = update.notes;
    }

    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }

    /// Birds no longer in the house (died or sold off).
    pub fn reduction(&self) -> u32 {
        self.initial_count.saturating_sub(self.current_count)
    }

    /// (initial - current) / initial * 100. Zero for an empty batch.
    pub fn mortality_rate(&self) -> Decimal {
        mortality_rate(self.initial_count, self.current_count)
    }

    /// Whole days since entry; negative if the entry date lies after `today`.
    pub fn age_in_days(&self, today: NaiveDate) -> i64 {
        (today - self.entry_date).num_days()
    }

    pub fn lookup(&self) -> BatchLookup {
        BatchLookup {
            batch_id: self.batch_id.clone(),
            breed: self.breed,
            current_count: self.current_count,
            average_weight: self.average_weight,
        }
    }
}

pub(crate) fn mortality_rate(initial: u32, current: u32) -> Decimal {
    if initial == 0 {
        return Decimal::ZERO;
    }
    let lost = Decimal::from(initial.saturating_sub(current));
    lost / Decimal::from(initial) * Decimal::ONE_HUNDRED
}

/// Validated input of the "add batch" form. A new batch starts active with
/// its whole initial count alive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub batch_id: String,
    pub entry_date: NaiveDate,
    pub initial_count: u32,
    pub breed: Breed,
    pub source: String,
    pub average_weight: Option<Decimal>,
    pub notes: Option<String>,
}

/// Validated input of the "edit batch" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub batch_id: String,
    pub entry_date: NaiveDate,
    pub initial_count: u32,
    pub current_count: u32,
    pub breed: Breed,
    pub source: String,
    pub status: BatchStatus,
    pub average_weight: Option<Decimal>,
    pub notes: Option<String>,
}

/// The slice of a batch other forms need: stock check and weight default in
/// sales, batch pickers in feeding and medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchLookup {
    pub batch_id: String,
    pub breed: Breed,
    pub current_count: u32,
    pub average_weight: Option<Decimal>,
}

impl BatchLookup {
    /// Picker text, e.g. `B2025001 (Cobb 500 - 3850 birds, avg: 2.2 kg)`.
    pub fn option_label(&self, locale: Locale) -> String {
        let breed = self.breed.localize(locale);
        match (locale, self.average_weight) {
            (Locale::En, Some(avg)) => format!(
                "{} ({} - {} birds, avg: {} kg)",
                self.batch_id, breed, self.current_count, avg
            ),
            (Locale::En, None) => {
                format!("{} ({} - {} birds)", self.batch_id, breed, self.current_count)
            }
            (Locale::Ar, Some(avg)) => format!(
                "{} ({} - {} طائر، متوسط: {} كجم)",
                self.batch_id, breed, self.current_count, avg
            ),
            (Locale::Ar, None) => {
                format!("{} ({} - {} طائر)", self.batch_id, breed, self.current_count)
            }
        }
    }
}

pub(crate) fn find_lookup<'a>(batches: &'a [BatchLookup], batch_id: &str) -> Option<&'a BatchLookup> {
    batches.iter().find(|b| b.batch_id == batch_id)
}
