use assert_matches::assert_matches;
use poultry_ledger::errors::ServiceError;
use poultry_ledger::forms::{CalculatorForm, Form};
use poultry_ledger::i18n::Locale;
use poultry_ledger::services::calculator::{CalculatorInput, Metric, UndefinedReason};
use poultry_ledger::services::CalculatorService;
use poultry_ledger::validation::{Field, Rule};
use rust_decimal_macros::dec;

#[test]
fn default_cycle_runs_at_a_loss() {
    let result = CalculatorService::new()
        .calculate(&CalculatorInput::default())
        .unwrap();

    assert_eq!(result.total_cost, dec!(67000));
    assert_eq!(result.expected_bird_count, dec!(4750));
    assert_eq!(result.expected_revenue, dec!(57475));
    assert_eq!(result.expected_profit, dec!(-9525));
    assert_eq!(result.cost_per_bird.round_dp(3), Metric::Value(dec!(14.105)));
    assert_eq!(result.profit_margin.round_dp(2), Metric::Value(dec!(-16.57)));
    assert_eq!(
        result.break_even_price_per_kg.round_dp(2),
        Metric::Value(dec!(6.41))
    );
    assert_eq!(result.undefined_metrics().count(), 0);
}

#[test]
fn form_defaults_parse_to_the_default_input() {
    let input = CalculatorForm::default().parse(&()).unwrap();
    assert_eq!(input, CalculatorInput::default());
}

#[test]
fn form_rejects_mortality_above_one_hundred() {
    let form = CalculatorForm::from_pairs([("expected_mortality", "120")]).unwrap();
    let errors = form.validate(&());
    assert_matches!(
        errors.get(Field::ExpectedMortality).map(|e| e.rule),
        Some(Rule::OutOfRange { .. })
    );
}

#[test]
fn direct_input_is_checked_before_computing() {
    let input = CalculatorInput {
        initial_bird_count: 0,
        expected_weight: dec!(0),
        ..CalculatorInput::default()
    };
    let err = CalculatorService::new().calculate(&input).unwrap_err();
    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains(Field::InitialBirdCount));
    assert!(errors.contains(Field::ExpectedWeight));
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[test]
fn total_mortality_reports_reasons_in_both_languages() {
    let input = CalculatorInput {
        expected_mortality: dec!(100),
        ..CalculatorInput::default()
    };
    let result = CalculatorService::new().calculate(&input).unwrap();

    assert_eq!(result.expected_revenue, dec!(0));
    assert_eq!(result.expected_profit, dec!(-67000));
    let undefined: Vec<_> = result.undefined_metrics().collect();
    assert_eq!(undefined.len(), 3);
    assert!(undefined
        .iter()
        .all(|(_, reason)| *reason == UndefinedReason::ZeroExpectedBirds));

    assert_eq!(
        result.cost_per_bird.display(Locale::En, 2),
        "undefined (no birds expected to survive)"
    );
    assert!(result.cost_per_bird.display(Locale::Ar, 2).starts_with("غير محدد"));
}
