//! Field-level validation shared by every record form.
//!
//! Validators map raw string inputs to a [`FieldErrors`] set keyed by
//! [`Field`]. An empty set means the form is valid. Errors are structured
//! ([`Rule`]) and only become display text through [`FieldError::message`].

mod field;
mod reader;

pub use field::Field;
pub use reader::{Bound, FormReader};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::i18n::{Locale, Localized};

/// Broad classification of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingRequired,
    Unparseable,
    OutOfRange,
    Inconsistent,
}

/// The rule a field value broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Required,
    NotANumber,
    NotAWholeNumber,
    NotADate,
    NotATime,
    UnknownOption,
    MustBePositive,
    MustBeNonNegative,
    OutOfRange { min: Decimal, max: Decimal },
    /// current_count above initial_count
    ExceedsInitialCount,
    /// requested quantity above the batch's live bird count
    ExceedsAvailable { available: u32 },
    /// next_due_date left empty on a vaccine record
    RequiredForVaccines,
}

impl Rule {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Rule::Required | Rule::RequiredForVaccines => ErrorKind::MissingRequired,
            Rule::NotANumber
            | Rule::NotAWholeNumber
            | Rule::NotADate
            | Rule::NotATime
            | Rule::UnknownOption => ErrorKind::Unparseable,
            Rule::MustBePositive | Rule::MustBeNonNegative | Rule::OutOfRange { .. } => {
                ErrorKind::OutOfRange
            }
            Rule::ExceedsInitialCount | Rule::ExceedsAvailable { .. } => ErrorKind::Inconsistent,
        }
    }
}

/// A single broken rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    #[serde(flatten)]
    pub rule: Rule,
}

impl FieldError {
    pub fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }

    pub fn kind(&self) -> ErrorKind {
        self.rule.kind()
    }

    /// Renders the error in the requested language.
    pub fn message(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.message_en(),
            Locale::Ar => self.message_ar(),
        }
    }

    fn message_en(&self) -> String {
        let label = self.field.localize(Locale::En);
        match &self.rule {
            Rule::Required => format!("{label} is required"),
            Rule::NotANumber => format!("{label} must be a valid number"),
            Rule::NotAWholeNumber => format!("{label} must be a whole number"),
            Rule::NotADate => format!("{label} must be a valid date (YYYY-MM-DD)"),
            Rule::NotATime => format!("{label} must be a valid time (HH:MM)"),
            Rule::UnknownOption => format!("{label} is not one of the available options"),
            Rule::MustBePositive => format!("{label} must be greater than zero"),
            Rule::MustBeNonNegative => format!("{label} must be greater than or equal to zero"),
            Rule::OutOfRange { min, max } => format!("{label} must be between {min} and {max}"),
            Rule::ExceedsInitialCount => {
                "Current count must be less than or equal to initial count".to_string()
            }
            Rule::ExceedsAvailable { available } => {
                format!("Quantity exceeds available birds ({available})")
            }
            Rule::RequiredForVaccines => "Next due date is required for vaccines".to_string(),
        }
    }

    fn message_ar(&self) -> String {
        let label = self.field.localize(Locale::Ar);
        let gender = self.field.gender();
        match &self.rule {
            Rule::Required => format!("{label} {}", gender.required()),
            Rule::NotANumber => format!("قيمة {label} ليست رقماً صالحاً"),
            Rule::NotAWholeNumber => format!("قيمة {label} يجب أن تكون عدداً صحيحاً"),
            Rule::NotADate => format!("قيمة {label} ليست تاريخاً صالحاً (YYYY-MM-DD)"),
            Rule::NotATime => format!("قيمة {label} ليست وقتاً صالحاً (HH:MM)"),
            Rule::UnknownOption => format!("قيمة {label} ليست من الخيارات المتاحة"),
            Rule::MustBePositive => format!("يجب أن {} {label} أكبر من صفر", gender.to_be()),
            Rule::MustBeNonNegative => format!(
                "يجب أن {} {label} أكبر من أو {} صفر",
                gender.to_be(),
                gender.equals()
            ),
            Rule::OutOfRange { min, max } => {
                format!("يجب أن تكون قيمة {label} بين {min} و {max}")
            }
            Rule::ExceedsInitialCount => {
                "يجب أن يكون العدد الحالي أقل من أو يساوي العدد الأولي".to_string()
            }
            Rule::ExceedsAvailable { available } => {
                format!("الكمية تتجاوز عدد الطيور المتاحة ({available})")
            }
            Rule::RequiredForVaccines => "تاريخ الاستحقاق التالي مطلوب للقاحات".to_string(),
        }
    }
}

/// Field name → broken rule. At most one error is kept per field: the first
/// rule a field fails is the one reported, and later checks on the same
/// field are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<Field, Rule>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `rule` for `field` unless the field already has an error.
    pub fn add(&mut self, field: Field, rule: Rule) {
        self.errors.entry(field).or_insert(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors
            .get(&field)
            .map(|rule| FieldError::new(field, rule.clone()))
    }

    /// Drops the error for one field, as happens when the user edits it.
    pub fn clear(&mut self, field: Field) -> Option<Rule> {
        self.errors.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldError> + '_ {
        self.errors
            .iter()
            .map(|(field, rule)| FieldError::new(*field, rule.clone()))
    }

    /// Field name → display message, ready for inline rendering.
    pub fn localized(&self, locale: Locale) -> BTreeMap<String, String> {
        self.iter()
            .map(|err| (err.field.to_string(), err.message(locale)))
            .collect()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, rule) in other.errors {
            self.add(field, rule);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", err.field, err.message(Locale::En))?;
        }
        Ok(())
    }
}

impl From<FieldError> for FieldErrors {
    fn from(err: FieldError) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(err.field, err.rule);
        errors
    }
}
