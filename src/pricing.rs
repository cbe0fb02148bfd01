//! # Price Engine
//!
//! Derives the price a frame actually sells for from its list price and an
//! optional discount rule. Everything here is pure.
//!
//! | Rule           | Result                                   |
//! |----------------|------------------------------------------|
//! | none           | `base`                                   |
//! | `Percentage`   | `original × (1 − value / 100)`           |
//! | `Fixed Amount` | `max(0, original − value)`               |
//!
//! Whatever the rule produces, a result that is not a finite number greater
//! than zero is replaced by `base`. Percentage values outside `0..=100` are
//! not clamped or rejected; they pass through and the fallback catches the
//! ones that make no sense.

use crate::model::DiscountType;
use serde::Serialize;

/// An active discount rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Discount {
    pub original_price: f64,
    pub kind: DiscountType,
    pub value: f64,
}

pub fn compute_final_price(base: f64, discount: Option<&Discount>) -> f64 {
    let Some(discount) = discount else {
        return base;
    };

    let discounted = match discount.kind {
        DiscountType::Percentage => discount.original_price * (1.0 - discount.value / 100.0),
        DiscountType::FixedAmount => (discount.original_price - discount.value).max(0.0),
    };

    if discounted.is_finite() && discounted > 0.0 {
        discounted
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent(original_price: f64, value: f64) -> Discount {
        Discount {
            original_price,
            kind: DiscountType::Percentage,
            value,
        }
    }

    fn fixed(original_price: f64, value: f64) -> Discount {
        Discount {
            original_price,
            kind: DiscountType::FixedAmount,
            value,
        }
    }

    #[test]
    fn test_no_discount_returns_base() {
        for base in [0.01, 1.0, 1485.5, 25_000.0] {
            assert_eq!(compute_final_price(base, None), base);
        }
    }

    #[test]
    fn test_percentage_discount() {
        let price = compute_final_price(4500.0, Some(&percent(4500.0, 67.0)));
        assert!((price - 1485.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_discount() {
        assert_eq!(compute_final_price(4500.0, Some(&fixed(4500.0, 3000.0))), 1500.0);
    }

    #[test]
    fn test_boundary_values() {
        // (discount, expected)
        let cases = [
            (percent(4500.0, 0.0), 4500.0),
            (percent(4500.0, 100.0), 4500.0), // zero falls back
            (percent(4500.0, 150.0), 4500.0), // negative falls back
            (percent(4500.0, -10.0), 4950.0), // passes through
            (fixed(4500.0, 0.0), 4500.0),
            (fixed(4500.0, 4500.0), 4500.0),
            (fixed(4500.0, 9000.0), 4500.0),
            (fixed(4500.0, -500.0), 5000.0),
        ];
        for (discount, expected) in cases {
            let price = compute_final_price(4500.0, Some(&discount));
            assert!(
                (price - expected).abs() < 1e-9,
                "{:?} gave {} instead of {}",
                discount,
                price,
                expected
            );
        }
    }

    #[test]
    fn test_non_numeric_falls_back() {
        assert_eq!(compute_final_price(800.0, Some(&percent(f64::NAN, 10.0))), 800.0);
        assert_eq!(compute_final_price(800.0, Some(&percent(800.0, f64::NAN))), 800.0);
        assert_eq!(compute_final_price(800.0, Some(&fixed(f64::INFINITY, 10.0))), 800.0);
    }

    #[test]
    fn test_result_is_positive_for_positive_base() {
        let bases = [0.5, 10.0, 999.99, 4500.0];
        let values = [-100.0, -1.0, 0.0, 1.0, 50.0, 99.0, 100.0, 101.0, 1e9];
        for base in bases {
            for value in values {
                for discount in [percent(base, value), fixed(base, value)] {
                    let price = compute_final_price(base, Some(&discount));
                    assert!(price > 0.0 && price.is_finite(), "{:?} -> {}", discount, price);
                }
            }
        }
    }
}
