//! Values the core computes from validated components instead of trusting
//! them from input.

use rust_decimal::Decimal;

/// Feeding total: kg fed × cost per kg.
pub fn feeding_total_cost(quantity: Decimal, cost_per_kg: Decimal) -> Option<Decimal> {
    quantity.checked_mul(cost_per_kg)
}

/// Sale revenue: kg sold × price per kg.
pub fn sales_total_revenue(weight_total: Decimal, price_per_kg: Decimal) -> Option<Decimal> {
    weight_total.checked_mul(price_per_kg)
}

/// Suggested sale weight: birds × the batch's average weight. `None` when
/// the batch has not been weighed.
pub fn default_weight_total(quantity: u32, average_weight: Option<Decimal>) -> Option<Decimal> {
    let average_weight = average_weight?;
    Decimal::from(quantity)
        .checked_mul(average_weight)
        .map(|w| w.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn totals_are_products() {
        assert_eq!(feeding_total_cost(dec!(400), dec!(1.15)), Some(dec!(460)));
        assert_eq!(sales_total_revenue(dec!(12000), dec!(5.5)), Some(dec!(66000)));
        assert_eq!(feeding_total_cost(Decimal::MAX, dec!(2)), None);
    }

    #[test]
    fn weight_default_needs_average() {
        assert_eq!(default_weight_total(1000, Some(dec!(2.2))), Some(dec!(2200)));
        assert_eq!(default_weight_total(1000, None), None);
        assert_eq!(
            default_weight_total(1000, Some(dec!(2.2))).unwrap().to_string(),
            "2200"
        );
    }
}
