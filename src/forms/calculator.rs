use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{form_fields, Form};
use crate::services::calculator::CalculatorInput;
use crate::validation::{Bound, Field, FieldErrors, FormReader};

/// Raw calculator inputs. Opens with the page's default figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorForm {
    pub initial_bird_count: String,
    pub bird_cost: String,
    pub feed_cost: String,
    pub medication_cost: String,
    pub utilities_cost: String,
    pub labor_cost: String,
    pub other_costs: String,
    pub expected_mortality: String,
    pub expected_weight: String,
    pub expected_price_per_kg: String,
}

impl From<&CalculatorInput> for CalculatorForm {
    fn from(input: &CalculatorInput) -> Self {
        Self {
            initial_bird_count: input.initial_bird_count.to_string(),
            bird_cost: input.bird_cost.to_string(),
            feed_cost: input.feed_cost.to_string(),
            medication_cost: input.medication_cost.to_string(),
            utilities_cost: input.utilities_cost.to_string(),
            labor_cost: input.labor_cost.to_string(),
            other_costs: input.other_costs.to_string(),
            expected_mortality: input.expected_mortality.to_string(),
            expected_weight: input.expected_weight.to_string(),
            expected_price_per_kg: input.expected_price_per_kg.to_string(),
        }
    }
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::from(&CalculatorInput::default())
    }
}

impl Form for CalculatorForm {
    type Output = CalculatorInput;
    type Context = ();

    const ENTITY: &'static str = "calculator";

    form_fields! {
        InitialBirdCount => initial_bird_count,
        BirdCost => bird_cost,
        FeedCost => feed_cost,
        MedicationCost => medication_cost,
        UtilitiesCost => utilities_cost,
        LaborCost => labor_cost,
        OtherCosts => other_costs,
        ExpectedMortality => expected_mortality,
        ExpectedWeight => expected_weight,
        ExpectedPricePerKg => expected_price_per_kg,
    }

    fn parse(&self, _ctx: &()) -> Result<CalculatorInput, FieldErrors> {
        let mut r = FormReader::new();
        let initial_bird_count =
            r.count(Field::InitialBirdCount, &self.initial_bird_count, Bound::Positive);
        let bird_cost = r.decimal(Field::BirdCost, &self.bird_cost, Bound::Positive);
        let feed_cost = r.decimal(Field::FeedCost, &self.feed_cost, Bound::NonNegative);
        let medication_cost =
            r.decimal(Field::MedicationCost, &self.medication_cost, Bound::NonNegative);
        let utilities_cost =
            r.decimal(Field::UtilitiesCost, &self.utilities_cost, Bound::NonNegative);
        let labor_cost = r.decimal(Field::LaborCost, &self.labor_cost, Bound::NonNegative);
        let other_costs = r.decimal(Field::OtherCosts, &self.other_costs, Bound::NonNegative);
        let expected_mortality = r.decimal(
            Field::ExpectedMortality,
            &self.expected_mortality,
            Bound::Between(Decimal::ZERO, Decimal::ONE_HUNDRED),
        );
        let expected_weight =
            r.decimal(Field::ExpectedWeight, &self.expected_weight, Bound::Positive);
        let expected_price_per_kg = r.decimal(
            Field::ExpectedPricePerKg,
            &self.expected_price_per_kg,
            Bound::Positive,
        );

        match (
            initial_bird_count,
            bird_cost,
            feed_cost,
            medication_cost,
            utilities_cost,
            labor_cost,
            other_costs,
            expected_mortality,
            expected_weight,
            expected_price_per_kg,
        ) {
            (
                Some(initial_bird_count),
                Some(bird_cost),
                Some(feed_cost),
                Some(medication_cost),
                Some(utilities_cost),
                Some(labor_cost),
                Some(other_costs),
                Some(expected_mortality),
                Some(expected_weight),
                Some(expected_price_per_kg),
            ) => Ok(CalculatorInput {
                initial_bird_count,
                bird_cost,
                feed_cost,
                medication_cost,
                utilities_cost,
                labor_cost,
                other_costs,
                expected_mortality,
                expected_weight,
                expected_price_per_kg,
            }),
            _ => Err(r.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;

    #[test]
    fn defaults_parse_to_default_input() {
        assert_eq!(
            CalculatorForm::default().parse(&()).unwrap(),
            CalculatorInput::default()
        );
    }

    #[test]
    fn mortality_must_be_a_percentage() {
        let form = CalculatorForm {
            expected_mortality: "120".into(),
            labor_cost: String::new(),
            ..Default::default()
        };
        let errors = form.validate(&());
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors.get(Field::ExpectedMortality).unwrap().rule,
            Rule::OutOfRange { .. }
        ));
        assert_eq!(errors.get(Field::LaborCost).unwrap().rule, Rule::Required);
    }
}
