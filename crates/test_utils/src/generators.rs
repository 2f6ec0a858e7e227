//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::{Money, Rate};
use domain_billing::{InvoiceItem, PaymentTerms};
use domain_catalog::{Service, ServiceCode};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for positive amounts in cents, up to 100,000.00
pub fn amount_cents_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Strategy for positive Money values with two decimal places
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    amount_cents_strategy().prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

/// Strategy for percentage rates from 0% to 100%, in hundredths
pub fn rate_strategy() -> impl Strategy<Value = Rate> {
    (0u32..=10_000u32).prop_map(|n| Rate::from_percent(Decimal::new(n as i64, 2)))
}

/// Strategy for discount rates bounded at 100%
pub fn discount_rate_strategy() -> impl Strategy<Value = Rate> {
    rate_strategy()
}

/// Strategy for billable quantities, whole or half units up to 50
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1u32..=100u32).prop_map(|halves| Decimal::new(halves as i64 * 5, 1))
}

/// Strategy for payment terms
pub fn payment_terms_strategy() -> impl Strategy<Value = PaymentTerms> {
    prop_oneof![
        Just(PaymentTerms::Immediate),
        Just(PaymentTerms::Days15),
        Just(PaymentTerms::Days30),
        Just(PaymentTerms::Days60),
        Just(PaymentTerms::Days90),
    ]
}

/// Strategy for issue dates within 2024 and 2025
pub fn issue_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u32..730u32).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset as u64)
    })
}

/// Strategy for services with random pricing
pub fn service_strategy() -> impl Strategy<Value = Service> {
    (positive_money_strategy(), rate_strategy(), 0u32..100_000u32).prop_map(
        |(price, tax_rate, n)| {
            Service::new(
                format!("Generated Service {n}"),
                ServiceCode::new(format!("GEN-{n:05}")).unwrap(),
                price,
            )
            .unwrap()
            .with_tax_rate(tax_rate)
            .unwrap()
        },
    )
}

/// Strategy for valid invoice lines
///
/// Every generated line passes [`InvoiceItem::validate`], so tests can
/// feed these straight into an invoice.
pub fn line_item_strategy() -> impl Strategy<Value = InvoiceItem> {
    (
        service_strategy(),
        quantity_strategy(),
        discount_rate_strategy(),
    )
        .prop_map(|(service, quantity, discount_rate)| {
            InvoiceItem::for_service(&service)
                .with_quantity(quantity)
                .with_discount_rate(discount_rate)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_money_is_positive(money in positive_money_strategy()) {
            prop_assert!(money.is_positive());
        }

        #[test]
        fn test_generated_lines_validate(item in line_item_strategy()) {
            prop_assert!(item.validate().is_ok());
        }

        #[test]
        fn test_generated_terms_produce_ordered_dates(
            terms in payment_terms_strategy(),
            issue_date in issue_date_strategy(),
        ) {
            prop_assert!(terms.due_date(issue_date) >= issue_date);
        }
    }
}
