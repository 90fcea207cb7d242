//! Cost/profit calculator for one production cycle.
//!
//! [`calculate`] is a pure function of its input. Ratios whose denominator
//! comes out as zero are returned as [`Metric::Undefined`] with the reason,
//! so no NaN or infinity can reach a caller.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::i18n::{Label, Locale, Localized};
use crate::metrics;
use crate::validation::{Field, FieldErrors, Rule};

/// Inputs of the calculator form, already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub initial_bird_count: u32,
    /// price of one chick
    pub bird_cost: Decimal,
    pub feed_cost: Decimal,
    pub medication_cost: Decimal,
    pub utilities_cost: Decimal,
    pub labor_cost: Decimal,
    pub other_costs: Decimal,
    /// percent, 0-100
    pub expected_mortality: Decimal,
    /// kg per bird at sale
    pub expected_weight: Decimal,
    pub expected_price_per_kg: Decimal,
}

impl Default for CalculatorInput {
    /// The figures the calculator page opens with.
    fn default() -> Self {
        Self {
            initial_bird_count: 5000,
            bird_cost: dec!(5),
            feed_cost: dec!(25000),
            medication_cost: dec!(5000),
            utilities_cost: dec!(3000),
            labor_cost: dec!(7000),
            other_costs: dec!(2000),
            expected_mortality: dec!(5),
            expected_weight: dec!(2.2),
            expected_price_per_kg: dec!(5.5),
        }
    }
}

impl CalculatorInput {
    /// Range checks on already-typed input. Forms run the same bounds while
    /// parsing; this guards direct library callers.
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.initial_bird_count == 0 {
            errors.add(Field::InitialBirdCount, Rule::MustBePositive);
        }
        for (field, value) in [
            (Field::BirdCost, self.bird_cost),
            (Field::ExpectedWeight, self.expected_weight),
            (Field::ExpectedPricePerKg, self.expected_price_per_kg),
        ] {
            if value <= Decimal::ZERO {
                errors.add(field, Rule::MustBePositive);
            }
        }
        for (field, value) in [
            (Field::FeedCost, self.feed_cost),
            (Field::MedicationCost, self.medication_cost),
            (Field::UtilitiesCost, self.utilities_cost),
            (Field::LaborCost, self.labor_cost),
            (Field::OtherCosts, self.other_costs),
        ] {
            if value < Decimal::ZERO {
                errors.add(field, Rule::MustBeNonNegative);
            }
        }
        if self.expected_mortality < Decimal::ZERO || self.expected_mortality > Decimal::ONE_HUNDRED
        {
            errors.add(
                Field::ExpectedMortality,
                Rule::OutOfRange {
                    min: Decimal::ZERO,
                    max: Decimal::ONE_HUNDRED,
                },
            );
        }
        errors
    }
}

/// Why a ratio has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UndefinedReason {
    /// every bird is expected to die
    ZeroExpectedBirds,
    ZeroExpectedRevenue,
}

impl Localized for UndefinedReason {
    fn label(&self) -> Label {
        match self {
            UndefinedReason::ZeroExpectedBirds => {
                Label::new("no birds expected to survive", "لا يُتوقع بقاء أي طائر")
            }
            UndefinedReason::ZeroExpectedRevenue => {
                Label::new("no revenue expected", "لا توجد إيرادات متوقعة")
            }
        }
    }
}

/// A derived ratio: either a value or a named reason it has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Value(Decimal),
    Undefined { reason: UndefinedReason },
}

impl Metric {
    fn ratio(numerator: Decimal, denominator: Decimal, reason: UndefinedReason) -> Self {
        match numerator.checked_div(denominator) {
            Some(value) if !denominator.is_zero() => Metric::Value(value),
            _ => Metric::Undefined { reason },
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Undefined { .. } => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Metric::Undefined { .. })
    }

    pub fn round_dp(&self, dp: u32) -> Self {
        match self {
            Metric::Value(v) => Metric::Value(v.round_dp(dp)),
            undefined => *undefined,
        }
    }

    /// Display text: the rounded value, or "undefined (reason)".
    pub fn display(&self, locale: Locale, dp: u32) -> String {
        match self {
            Metric::Value(v) => v.round_dp(dp).to_string(),
            Metric::Undefined { reason } => match locale {
                Locale::En => format!("undefined ({})", reason.localize(locale)),
                Locale::Ar => format!("غير محدد ({})", reason.localize(locale)),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    pub total_cost: Decimal,
    pub expected_bird_count: Decimal,
    pub cost_per_bird: Metric,
    pub expected_revenue: Decimal,
    pub expected_profit: Decimal,
    /// percent of revenue
    pub profit_margin: Metric,
    pub break_even_price_per_kg: Metric,
}

impl CalculatorResult {
    pub fn undefined_metrics(&self) -> impl Iterator<Item = (&'static str, UndefinedReason)> + '_ {
        [
            ("cost_per_bird", self.cost_per_bird),
            ("profit_margin", self.profit_margin),
            ("break_even_price_per_kg", self.break_even_price_per_kg),
        ]
        .into_iter()
        .filter_map(|(name, metric)| match metric {
            Metric::Undefined { reason } => Some((name, reason)),
            Metric::Value(_) => None,
        })
    }
}

fn overflow() -> ServiceError {
    ServiceError::InvalidInput("Calculator inputs are too large to compute".to_string())
}

fn sum(terms: &[Decimal]) -> Result<Decimal, ServiceError> {
    terms
        .iter()
        .try_fold(Decimal::ZERO, |acc, term| acc.checked_add(*term))
        .ok_or_else(overflow)
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, ServiceError> {
    a.checked_mul(b).ok_or_else(overflow)
}

/// Computes the derived financial metrics for one cycle.
///
/// Rejects out-of-range input with [`ServiceError::ValidationError`] before
/// any arithmetic runs.
pub fn calculate(input: &CalculatorInput) -> Result<CalculatorResult, ServiceError> {
    let errors = input.check();
    if !errors.is_empty() {
        return Err(ServiceError::ValidationError(errors));
    }

    let birds = Decimal::from(input.initial_bird_count);
    let chicks_cost = mul(birds, input.bird_cost)?;
    let total_cost = sum(&[
        chicks_cost,
        input.feed_cost,
        input.medication_cost,
        input.utilities_cost,
        input.labor_cost,
        input.other_costs,
    ])?;

    let survival = Decimal::ONE - input.expected_mortality / Decimal::ONE_HUNDRED;
    let expected_bird_count = mul(birds, survival)?;
    let expected_kg = mul(expected_bird_count, input.expected_weight)?;
    let expected_revenue = mul(expected_kg, input.expected_price_per_kg)?;
    let expected_profit = expected_revenue
        .checked_sub(total_cost)
        .ok_or_else(overflow)?;

    let cost_per_bird = Metric::ratio(
        total_cost,
        expected_bird_count,
        UndefinedReason::ZeroExpectedBirds,
    );
    let profit_margin = if expected_bird_count.is_zero() {
        Metric::Undefined {
            reason: UndefinedReason::ZeroExpectedBirds,
        }
    } else {
        match Metric::ratio(
            expected_profit,
            expected_revenue,
            UndefinedReason::ZeroExpectedRevenue,
        ) {
            Metric::Value(share) => Metric::Value(mul(share, Decimal::ONE_HUNDRED)?),
            undefined => undefined,
        }
    };
    let break_even_price_per_kg =
        Metric::ratio(total_cost, expected_kg, UndefinedReason::ZeroExpectedBirds);

    Ok(CalculatorResult {
        total_cost,
        expected_bird_count,
        cost_per_bird,
        expected_revenue,
        expected_profit,
        profit_margin,
        break_even_price_per_kg,
    })
}

/// Calculator entry point with logging and metrics around [`calculate`].
#[derive(Debug, Clone, Default)]
pub struct CalculatorService;

impl CalculatorService {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, input))]
    pub fn calculate(&self, input: &CalculatorInput) -> Result<CalculatorResult, ServiceError> {
        let result = calculate(input).map_err(|e| {
            if e.field_errors().is_some() {
                metrics::validation_rejected("calculator");
            }
            warn!(error = %e, "calculator input rejected");
            e
        })?;
        metrics::calculation_performed();
        for (name, reason) in result.undefined_metrics() {
            metrics::undefined_metric(reason.as_ref());
            warn!(metric = name, reason = reason.as_ref(), "calculator metric is undefined");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_scenario_matches_the_calculator_page() {
        let result = calculate(&CalculatorInput::default()).unwrap();
        assert_eq!(result.total_cost, dec!(67000));
        assert_eq!(result.expected_bird_count, dec!(4750));
        assert_eq!(result.cost_per_bird.round_dp(3), Metric::Value(dec!(14.105)));
        assert_eq!(result.expected_revenue, dec!(57475));
        assert_eq!(result.expected_profit, dec!(-9525));
        assert_eq!(result.profit_margin.round_dp(2), Metric::Value(dec!(-16.57)));
        assert_eq!(
            result.break_even_price_per_kg.round_dp(4),
            Metric::Value(dec!(6.4115))
        );
    }

    #[test]
    fn total_loss_leaves_ratios_undefined() {
        let input = CalculatorInput {
            expected_mortality: dec!(100),
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.expected_bird_count, Decimal::ZERO);
        assert_eq!(result.expected_revenue, Decimal::ZERO);
        assert_eq!(result.expected_profit, -result.total_cost);
        let undefined = Metric::Undefined {
            reason: UndefinedReason::ZeroExpectedBirds,
        };
        assert_eq!(result.cost_per_bird, undefined);
        assert_eq!(result.profit_margin, undefined);
        assert_eq!(result.break_even_price_per_kg, undefined);
        assert_eq!(result.undefined_metrics().count(), 3);
    }

    #[test]
    fn non_positive_required_inputs_are_rejected() {
        let input = CalculatorInput {
            initial_bird_count: 0,
            bird_cost: dec!(-1),
            feed_cost: dec!(-5),
            expected_mortality: dec!(101),
            ..Default::default()
        };
        let err = calculate(&input).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::BirdCost).unwrap().rule,
            Rule::MustBePositive
        );
        assert_eq!(
            errors.get(Field::FeedCost).unwrap().rule,
            Rule::MustBeNonNegative
        );
    }

    #[test]
    fn huge_inputs_fail_instead_of_panicking() {
        let input = CalculatorInput {
            bird_cost: Decimal::MAX,
            ..Default::default()
        };
        assert_matches!(calculate(&input), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn undefined_metric_displays_reason() {
        let metric = Metric::Undefined {
            reason: UndefinedReason::ZeroExpectedBirds,
        };
        assert_eq!(
            metric.display(Locale::En, 2),
            "undefined (no birds expected to survive)"
        );
        assert_eq!(Metric::Value(dec!(14.10526)).display(Locale::En, 2), "14.11");
    }

    #[test]
    fn serializes_undefined_with_reason() {
        let json = serde_json::to_value(Metric::Undefined {
            reason: UndefinedReason::ZeroExpectedRevenue,
        })
        .unwrap();
        assert_eq!(json["undefined"]["reason"], "zero_expected_revenue");
    }
}
