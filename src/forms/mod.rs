//! Raw form state and the validators that turn it into typed entries.
//!
//! A form holds the user's raw strings. [`Form::parse`] is the validator: it
//! either yields the typed entry or a [`FieldErrors`] map, never mutating the
//! form. [`FormSession`] layers the interactive behavior on top: submitting
//! records the errors, and changing a field clears that field's error and
//! applies the form's change rules.

use std::str::FromStr;

use crate::errors::ServiceError;
use crate::validation::{Field, FieldErrors};

/// Generates `fields`, `field` and `field_mut` for a struct of `String`s
/// whose member names match the [`Field`] wire names.
macro_rules! form_fields {
    ($($variant:ident => $member:ident),+ $(,)?) => {
        fn fields() -> &'static [$crate::validation::Field] {
            &[$($crate::validation::Field::$variant),+]
        }

        fn field(&self, field: $crate::validation::Field) -> Option<&str> {
            match field {
                $($crate::validation::Field::$variant => Some(self.$member.as_str()),)+
                _ => None,
            }
        }

        fn field_mut(&mut self, field: $crate::validation::Field) -> Option<&mut String> {
            match field {
                $($crate::validation::Field::$variant => Some(&mut self.$member),)+
                _ => None,
            }
        }
    };
}
pub(crate) use form_fields;

pub mod calculator;
pub mod expense;
pub mod feeding;
pub mod inventory;
pub mod medication;
pub mod sales;

pub use calculator::CalculatorForm;
pub use expense::ExpenseForm;
pub use feeding::FeedingForm;
pub use inventory::{BatchEditForm, BatchForm};
pub use medication::MedicationForm;
pub use sales::{SalesEditForm, SalesForm};

pub trait Form: Clone + Default {
    /// Typed value a valid form parses into.
    type Output;
    /// Outside data the rules need (for example the batch list).
    type Context: ?Sized;

    /// Entity name used in logs and metrics.
    const ENTITY: &'static str;

    fn fields() -> &'static [Field];

    fn field(&self, field: Field) -> Option<&str>;

    fn field_mut(&mut self, field: Field) -> Option<&mut String>;

    fn parse(&self, ctx: &Self::Context) -> Result<Self::Output, FieldErrors>;

    fn validate(&self, ctx: &Self::Context) -> FieldErrors {
        match self.parse(ctx) {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors,
        }
    }

    /// Hook run after `field` took a new value.
    fn after_change(&mut self, _field: Field, _ctx: &Self::Context) {}

    /// Whether the field currently refuses edits.
    fn is_locked(&self, _field: Field) -> bool {
        false
    }

    /// Builds a form from `name=value` pairs, starting from the defaults.
    fn from_pairs<'a, I>(pairs: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::default();
        for (name, value) in pairs {
            let field = Field::from_str(name.trim())
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown field: {name}")))?;
            let slot = form.field_mut(field).ok_or_else(|| {
                ServiceError::InvalidInput(format!(
                    "{field} is not part of the {} form",
                    Self::ENTITY
                ))
            })?;
            *slot = value.to_string();
        }
        Ok(form)
    }
}

/// Interactive state of one form: the raw values plus the errors from the
/// last submit.
#[derive(Debug, Clone, Default)]
pub struct FormSession<F: Form> {
    form: F,
    errors: FieldErrors,
}

impl<F: Form> FormSession<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            errors: FieldErrors::new(),
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_form(self) -> F {
        self.form
    }

    /// Sets one field. Its pending error is cleared and the form's change
    /// rules run; errors on other fields stay until the next submit.
    pub fn change(
        &mut self,
        field: Field,
        value: impl Into<String>,
        ctx: &F::Context,
    ) -> Result<(), ServiceError> {
        if self.form.is_locked(field) {
            return Err(ServiceError::InvalidOperation(format!(
                "{field} is locked"
            )));
        }
        let slot = self.form.field_mut(field).ok_or_else(|| {
            ServiceError::InvalidInput(format!("{field} is not part of the {} form", F::ENTITY))
        })?;
        *slot = value.into();
        self.errors.clear(field);
        self.form.after_change(field, ctx);
        Ok(())
    }

    /// Runs the validator and keeps its errors for display.
    pub fn submit(&mut self, ctx: &F::Context) -> Result<F::Output, FieldErrors> {
        match self.form.parse(ctx) {
            Ok(output) => {
                self.errors = FieldErrors::new();
                Ok(output)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}
