use serde::{Deserialize, Serialize};

use super::{form_fields, Form};
use crate::models::{ExpenseEntry, ExpenseRecord, ExpenseType, PaymentMethod};
use crate::validation::{Bound, Field, FieldErrors, FormReader};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseForm {
    pub expense_date: String,
    pub expense_type: String,
    pub amount: String,
    pub payment_method: String,
    pub description: String,
    pub vendor: String,
    pub receipt_number: String,
}

impl ExpenseForm {
    pub fn from_record(record: &ExpenseRecord) -> Self {
        Self {
            expense_date: record.expense_date.to_string(),
            expense_type: record.expense_type.to_string(),
            amount: record.amount.to_string(),
            payment_method: record.payment_method.to_string(),
            description: record.description.clone(),
            vendor: record.vendor.clone().unwrap_or_default(),
            receipt_number: record.receipt_number.clone().unwrap_or_default(),
        }
    }
}

impl Form for ExpenseForm {
    type Output = ExpenseEntry;
    type Context = ();

    const ENTITY: &'static str = "expense";

    form_fields! {
        ExpenseDate => expense_date,
        ExpenseType => expense_type,
        Amount => amount,
        PaymentMethod => payment_method,
        Description => description,
        Vendor => vendor,
        ReceiptNumber => receipt_number,
    }

    fn parse(&self, _ctx: &()) -> Result<ExpenseEntry, FieldErrors> {
        let mut r = FormReader::new();
        let expense_date = r.date(Field::ExpenseDate, &self.expense_date);
        let expense_type = r.option::<ExpenseType>(Field::ExpenseType, &self.expense_type);
        let amount = r.decimal(Field::Amount, &self.amount, Bound::Positive);
        let payment_method = r.option::<PaymentMethod>(Field::PaymentMethod, &self.payment_method);
        let description = r.text(Field::Description, &self.description);
        let vendor = r.optional_text(&self.vendor);
        let receipt_number = r.optional_text(&self.receipt_number);

        match (expense_date, expense_type, amount, payment_method, description) {
            (
                Some(expense_date),
                Some(expense_type),
                Some(amount),
                Some(payment_method),
                Some(description),
            ) if r.errors().is_empty() => Ok(ExpenseEntry {
                expense_date,
                expense_type,
                amount,
                payment_method,
                description,
                vendor,
                receipt_number,
            }),
            _ => Err(r.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::validation::Rule;

    #[test]
    fn negative_amount_reads_as_not_positive() {
        let form = ExpenseForm {
            expense_date: "2025-04-03".into(),
            expense_type: "Utilities".into(),
            amount: "-10".into(),
            payment_method: "Bank Transfer".into(),
            description: "Electricity bill".into(),
            ..Default::default()
        };
        let errors = form.validate(&());
        assert_eq!(errors.len(), 1);
        let err = errors.get(Field::Amount).unwrap();
        assert_eq!(err.rule, Rule::MustBePositive);
        assert_eq!(err.message(Locale::En), "Amount must be greater than zero");
        assert_eq!(err.message(Locale::Ar), "يجب أن يكون المبلغ أكبر من صفر");
    }

    #[test]
    fn unknown_expense_type_is_flagged() {
        let form = ExpenseForm {
            expense_type: "Fuel".into(),
            ..Default::default()
        };
        let errors = form.validate(&());
        assert_eq!(
            errors.get(Field::ExpenseType).unwrap().rule,
            Rule::UnknownOption
        );
    }
}
