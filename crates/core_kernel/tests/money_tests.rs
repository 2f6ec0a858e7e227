//! Comprehensive unit tests for the Money module
//!
//! Tests cover money creation, arithmetic operations, rounding,
//! rate application, and edge cases.

use core_kernel::{Money, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_new_does_not_round() {
        let m = Money::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.123456789));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_from_minor_negative_cents() {
        let m = Money::from_minor(-250);
        assert_eq!(m.amount(), dec!(-2.50));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero();
        assert!(m.is_zero());
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_from_decimal() {
        let m: Money = dec!(42.42).into();
        assert_eq!(m.amount(), dec!(42.42));
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_zero_true_for_zero_amount() {
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_is_zero_false_for_positive_amount() {
        assert!(!Money::new(dec!(0.01)).is_zero());
    }

    #[test]
    fn test_is_positive_true_for_positive_amount() {
        assert!(Money::new(dec!(100.00)).is_positive());
    }

    #[test]
    fn test_is_positive_false_for_zero() {
        assert!(!Money::zero().is_positive());
    }

    #[test]
    fn test_is_positive_false_for_negative() {
        assert!(!Money::new(dec!(-100.00)).is_positive());
    }

    #[test]
    fn test_is_negative_true_for_negative_amount() {
        assert!(Money::new(dec!(-100.00)).is_negative());
    }

    #[test]
    fn test_is_negative_false_for_zero() {
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        assert!(!Money::new(dec!(-0.00)).is_negative());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_addition() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.25));
        assert_eq!((a + b).amount(), dec!(150.25));
    }

    #[test]
    fn test_subtraction() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.25));
        assert_eq!((a - b).amount(), dec!(49.75));
    }

    #[test]
    fn test_subtraction_can_go_negative() {
        let a = Money::new(dec!(50.00));
        let b = Money::new(dec!(100.00));
        assert_eq!((a - b).amount(), dec!(-50.00));
    }

    #[test]
    fn test_negation() {
        let m = Money::new(dec!(75.50));
        assert_eq!((-m).amount(), dec!(-75.50));
    }

    #[test]
    fn test_checked_add_succeeds_normally() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(1.00));
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(101.00));
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = Money::new(Decimal::MAX);
        let b = Money::new(dec!(1));
        assert_eq!(a.checked_add(&b), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_sub_overflow() {
        let a = Money::new(Decimal::MIN);
        let b = Money::new(dec!(1));
        assert_eq!(a.checked_sub(&b), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_multiply_by_quantity() {
        let m = Money::new(dec!(33.50));
        assert_eq!(m.multiply(dec!(3)).amount(), dec!(100.50));
    }

    #[test]
    fn test_multiply_operator() {
        let m = Money::new(dec!(10.00));
        assert_eq!((m * dec!(2.5)).amount(), dec!(25.00));
    }

    #[test]
    fn test_divide() {
        let m = Money::new(dec!(100.00));
        assert_eq!(m.divide(dec!(4)).unwrap().amount(), dec!(25));
    }

    #[test]
    fn test_divide_by_zero_errors() {
        let m = Money::new(dec!(100.00));
        assert_eq!(m.divide(dec!(0)), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_abs() {
        assert_eq!(Money::new(dec!(-12.34)).abs().amount(), dec!(12.34));
        assert_eq!(Money::new(dec!(12.34)).abs().amount(), dec!(12.34));
    }

    #[test]
    fn test_sum_over_iterator() {
        let parts = vec![
            Money::new(dec!(10.00)),
            Money::new(dec!(20.00)),
            Money::new(dec!(30.00)),
        ];
        let total: Money = parts.into_iter().sum();
        assert_eq!(total.amount(), dec!(60.00));
    }

    #[test]
    fn test_sum_of_empty_iterator_is_zero() {
        let total: Money = std::iter::empty::<Money>().sum();
        assert!(total.is_zero());
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_comparisons() {
        let small = Money::new(dec!(9.99));
        let large = Money::new(dec!(10.00));
        assert!(small < large);
        assert!(large >= small);
        assert_eq!(Money::new(dec!(1.0)), Money::new(dec!(1.00)));
    }

    #[test]
    fn test_max_of_amounts() {
        let a = Money::new(dec!(5));
        let b = Money::new(dec!(7));
        assert_eq!(a.max(b), b);
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_2dp_truncates_long_fractions() {
        let m = Money::new(dec!(10.4567));
        assert_eq!(m.round_2dp().amount(), dec!(10.46));
    }

    #[test]
    fn test_round_2dp_midpoint_goes_to_even() {
        assert_eq!(Money::new(dec!(2.125)).round_2dp().amount(), dec!(2.12));
        assert_eq!(Money::new(dec!(2.135)).round_2dp().amount(), dec!(2.14));
        assert_eq!(Money::new(dec!(-2.125)).round_2dp().amount(), dec!(-2.12));
    }

    #[test]
    fn test_round_2dp_leaves_short_fractions_alone() {
        let m = Money::new(dec!(10.4));
        assert_eq!(m.round_2dp().amount(), dec!(10.4));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(Money::new(dec!(1234.5)).to_string(), "$1234.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Money::new(dec!(-5)).to_string(), "$-5.00");
    }
}

mod serde_format {
    use super::*;

    #[test]
    fn test_money_serializes_as_bare_number() {
        let m = Money::new(dec!(199.99));
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"199.99\"");
    }

    #[test]
    fn test_money_round_trips() {
        let m = Money::new(dec!(0.015));
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_rate_serializes_as_percent_value() {
        let r = Rate::from_percent(dec!(8.25));
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"8.25\"");
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_from_percent_and_back() {
        let rate = Rate::from_percent(dec!(18));
        assert_eq!(rate.as_percent(), dec!(18));
        assert_eq!(rate.fraction(), dec!(0.18));
    }

    #[test]
    fn test_apply_to_money() {
        let rate = Rate::from_percent(dec!(10));
        let base = Money::new(dec!(250.00));
        assert_eq!(rate.apply(&base).amount(), dec!(25.0000));
    }

    #[test]
    fn test_zero_rate_applies_to_zero() {
        let rate = Rate::zero();
        let base = Money::new(dec!(999.99));
        assert!(rate.apply(&base).is_zero());
    }

    #[test]
    fn test_fractional_percent() {
        let rate = Rate::from_percent(dec!(2.5));
        let base = Money::new(dec!(1000));
        assert_eq!(rate.apply(&base).amount(), dec!(25.000));
    }

    #[test]
    fn test_rate_ordering() {
        assert!(Rate::from_percent(dec!(5)) < Rate::from_percent(dec!(5.01)));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn addition_commutes(a in -1_000_000i64..1_000_000i64, b in -1_000_000i64..1_000_000i64) {
            let ma = Money::from_minor(a);
            let mb = Money::from_minor(b);
            prop_assert_eq!(ma + mb, mb + ma);
        }

        #[test]
        fn subtraction_inverts_addition(a in -1_000_000i64..1_000_000i64, b in -1_000_000i64..1_000_000i64) {
            let ma = Money::from_minor(a);
            let mb = Money::from_minor(b);
            prop_assert_eq!((ma + mb) - mb, ma);
        }

        #[test]
        fn round_2dp_is_idempotent(cents in -1_000_000_000i64..1_000_000_000i64) {
            let m = Money::from_minor(cents);
            prop_assert_eq!(m.round_2dp(), m.round_2dp().round_2dp());
        }
    }
}
