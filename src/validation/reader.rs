use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Field, FieldErrors, Rule};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Lower/upper limit a parsed number has to respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// strictly greater than zero
    Positive,
    /// zero allowed
    NonNegative,
    /// inclusive range
    Between(Decimal, Decimal),
}

impl Bound {
    fn check(&self, value: Decimal) -> Option<Rule> {
        match *self {
            Bound::Positive if value <= Decimal::ZERO => Some(Rule::MustBePositive),
            Bound::NonNegative if value < Decimal::ZERO => Some(Rule::MustBeNonNegative),
            Bound::Between(min, max) if value < min || value > max => {
                Some(Rule::OutOfRange { min, max })
            }
            _ => None,
        }
    }
}

/// Explicit parse-or-fail step for raw form strings.
///
/// Every accessor returns `None` and records a [`Rule`] when the input is
/// missing or malformed, so a form parser can read all of its fields in one
/// pass and report every problem at once.
#[derive(Debug, Default)]
pub struct FormReader {
    errors: FieldErrors,
}

impl FormReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: Field, rule: Rule) {
        self.errors.add(field, rule);
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.contains(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    /// Non-blank text, trimmed.
    pub fn text(&mut self, field: Field, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.fail(field, Rule::Required);
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Optional free text; blank becomes `None`.
    pub fn optional_text(&mut self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn decimal(&mut self, field: Field, raw: &str, bound: Bound) -> Option<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.fail(field, Rule::Required);
            return None;
        }
        self.parse_decimal(field, trimmed, bound)
    }

    pub fn optional_decimal(&mut self, field: Field, raw: &str, bound: Bound) -> Option<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.parse_decimal(field, trimmed, bound)
    }

    fn parse_decimal(&mut self, field: Field, trimmed: &str, bound: Bound) -> Option<Decimal> {
        let value = match Decimal::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                self.fail(field, Rule::NotANumber);
                return None;
            }
        };
        if let Some(rule) = bound.check(value) {
            self.fail(field, rule);
            return None;
        }
        Some(value)
    }

    /// Whole-number count (birds, days).
    pub fn count(&mut self, field: Field, raw: &str, bound: Bound) -> Option<u32> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.fail(field, Rule::Required);
            return None;
        }
        self.parse_count(field, trimmed, bound)
    }

    pub fn optional_count(&mut self, field: Field, raw: &str, bound: Bound) -> Option<u32> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.parse_count(field, trimmed, bound)
    }

    fn parse_count(&mut self, field: Field, trimmed: &str, bound: Bound) -> Option<u32> {
        let value = match Decimal::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                self.fail(field, Rule::NotANumber);
                return None;
            }
        };
        // range before integrality so "-10" reads as "must be greater than zero"
        if let Some(rule) = bound.check(value) {
            self.fail(field, rule);
            return None;
        }
        if !value.fract().is_zero() {
            self.fail(field, Rule::NotAWholeNumber);
            return None;
        }
        match value.to_u32() {
            Some(count) => Some(count),
            None => {
                self.fail(
                    field,
                    Rule::OutOfRange {
                        min: Decimal::ZERO,
                        max: Decimal::from(u32::MAX),
                    },
                );
                None
            }
        }
    }

    /// A total derived from already-read components. `None` means the
    /// product left `Decimal`'s range and is reported on `field`.
    pub fn derived_total(&mut self, field: Field, total: Option<Decimal>) -> Option<Decimal> {
        if total.is_none() {
            self.fail(
                field,
                Rule::OutOfRange {
                    min: Decimal::ZERO,
                    max: Decimal::MAX,
                },
            );
        }
        total
    }

    pub fn date(&mut self, field: Field, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.fail(field, Rule::Required);
            return None;
        }
        self.parse_date(field, trimmed)
    }

    pub fn optional_date(&mut self, field: Field, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.parse_date(field, trimmed)
    }

    fn parse_date(&mut self, field: Field, trimmed: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, Rule::NotADate);
                None
            }
        }
    }

    pub fn optional_time(&mut self, field: Field, raw: &str) -> Option<NaiveTime> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveTime::parse_from_str(trimmed, TIME_FORMAT) {
            Ok(time) => Some(time),
            Err(_) => {
                self.fail(field, Rule::NotATime);
                None
            }
        }
    }

    /// One of a fixed set of option values.
    pub fn option<T: FromStr>(&mut self, field: Field, raw: &str) -> Option<T> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.fail(field, Rule::Required);
            return None;
        }
        match T::from_str(trimmed) {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(field, Rule::UnknownOption);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_text_is_required() {
        let mut reader = FormReader::new();
        assert_eq!(reader.text(Field::Breed, "   "), None);
        assert_eq!(
            reader.errors().get(Field::Breed).unwrap().rule,
            Rule::Required
        );
    }

    #[test]
    fn negative_amount_is_out_of_range_not_unparseable() {
        let mut reader = FormReader::new();
        assert_eq!(reader.decimal(Field::Amount, "-10", Bound::Positive), None);
        assert_eq!(
            reader.errors().get(Field::Amount).unwrap().rule,
            Rule::MustBePositive
        );
    }

    #[test]
    fn garbage_number_is_reported() {
        let mut reader = FormReader::new();
        assert_eq!(reader.decimal(Field::Amount, "12abc", Bound::Positive), None);
        assert_eq!(
            reader.errors().get(Field::Amount).unwrap().rule,
            Rule::NotANumber
        );
    }

    #[test]
    fn counts_must_be_whole() {
        let mut reader = FormReader::new();
        assert_eq!(
            reader.count(Field::InitialCount, "12.5", Bound::Positive),
            None
        );
        assert_eq!(
            reader.errors().get(Field::InitialCount).unwrap().rule,
            Rule::NotAWholeNumber
        );
        assert_eq!(
            reader.count(Field::CurrentCount, "0", Bound::NonNegative),
            Some(0)
        );
        assert_eq!(
            reader.count(Field::Quantity, "3850.00", Bound::Positive),
            Some(3850)
        );
    }

    #[test]
    fn range_bound_is_inclusive() {
        let mut reader = FormReader::new();
        let bound = Bound::Between(dec!(0), dec!(100));
        assert_eq!(
            reader.decimal(Field::ExpectedMortality, "100", bound),
            Some(dec!(100))
        );
        assert_eq!(reader.decimal(Field::ExpectedMortality, "100.5", bound), None);
    }

    #[test]
    fn dates_use_iso_format() {
        let mut reader = FormReader::new();
        assert_eq!(
            reader.date(Field::SaleDate, "2025-04-08"),
            NaiveDate::from_ymd_opt(2025, 4, 8)
        );
        assert_eq!(reader.date(Field::FeedDate, "08/04/2025"), None);
        assert_eq!(
            reader.errors().get(Field::FeedDate).unwrap().rule,
            Rule::NotADate
        );
        assert_eq!(reader.optional_date(Field::NextDueDate, ""), None);
        assert!(!reader.has_error(Field::NextDueDate));
    }
}
