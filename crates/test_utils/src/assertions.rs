//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_billing::Invoice;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: Money, expected: Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: Money) {
    assert!(money.is_positive(), "Expected positive money, got {}", money);
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that an invoice's cached totals agree with its lines
///
/// Checks the reconstruction identity: the cached subtotal and tax must
/// equal the sums over the lines, and the cached total must equal
/// subtotal plus tax minus the invoice-level discount.
pub fn assert_totals_consistent(invoice: &Invoice) {
    let line_subtotal: Money = invoice.items().iter().map(|i| i.taxable_amount()).sum();
    let line_tax: Money = invoice.items().iter().map(|i| i.tax_amount()).sum();

    assert_eq!(
        invoice.subtotal(),
        line_subtotal,
        "Cached subtotal {} does not match line sum {}",
        invoice.subtotal(),
        line_subtotal
    );
    assert_eq!(
        invoice.tax_amount(),
        line_tax,
        "Cached tax {} does not match line sum {}",
        invoice.tax_amount(),
        line_tax
    );
    assert_eq!(
        invoice.total_amount(),
        invoice.subtotal() + invoice.tax_amount() - invoice.discount_amount(),
        "Cached total {} does not reconstruct from subtotal {}, tax {}, discount {}",
        invoice.total_amount(),
        invoice.subtotal(),
        invoice.tax_amount(),
        invoice.discount_amount()
    );
}

/// Asserts that the payment balance identity holds
///
/// Settled payments plus the pending balance must cover the total exactly.
pub fn assert_balance_consistent(invoice: &Invoice) {
    assert_eq!(
        invoice.amount_paid() + invoice.amount_pending(),
        invoice.total_amount(),
        "Paid {} plus pending {} does not equal total {}",
        invoice.amount_paid(),
        invoice.amount_pending(),
        invoice.total_amount()
    );
}
