//! Payment totalizer tests
//!
//! Tests for the order-total computation and the freeze semantics: a
//! payment's total reflects the order at capture time and never changes
//! afterward.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::ledger::order_total;
use std::str::FromStr;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Lines (qty=2, price=3.00) and (qty=1, price=7.00) total 13.00
#[test]
fn test_two_line_order_total() {
    let lines = [(2, dec("3.00")), (1, dec("7.00"))];
    assert_eq!(order_total(&lines), dec("13.00"));
}

#[test]
fn test_empty_order_totals_zero() {
    assert_eq!(order_total(&[]), Decimal::ZERO);
}

#[test]
fn test_single_line_total() {
    let lines = [(3, dec("5.00"))];
    assert_eq!(order_total(&lines), dec("15.00"));
}

#[test]
fn test_total_respects_frozen_line_prices() {
    // price_each was frozen at 4.50 when the line was created; a later stock
    // price change to 6.00 must not affect the total
    let frozen_lines = [(2, dec("4.50"))];
    assert_eq!(order_total(&frozen_lines), dec("9.00"));
}

#[test]
fn test_captured_total_is_frozen() {
    // Totalize at capture time
    let lines_at_capture = [(2, dec("3.00")), (1, dec("7.00"))];
    let captured = order_total(&lines_at_capture);

    // The order's lines change afterward
    let lines_now = [(5, dec("3.00"))];
    let live_total = order_total(&lines_now);

    // The payment keeps the captured value
    assert_eq!(captured, dec("13.00"));
    assert_ne!(captured, live_total);
}

#[test]
fn test_decimal_precision() {
    let lines = [(3, dec("19.99")), (7, dec("0.01"))];
    assert_eq!(order_total(&lines), dec("60.04"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

/// Strategy for prices with two decimal places
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Total equals the sum of the individual line totals
    #[test]
    fn prop_total_is_sum_of_lines(
        lines in prop::collection::vec((1i32..100, price_strategy()), 0..10)
    ) {
        let expected: Decimal = lines
            .iter()
            .map(|(quantity, price)| Decimal::from(*quantity) * price)
            .sum();

        prop_assert_eq!(order_total(&lines), expected);
    }

    /// Total is non-negative for valid lines
    #[test]
    fn prop_total_non_negative(
        lines in prop::collection::vec((1i32..100, price_strategy()), 0..10)
    ) {
        prop_assert!(order_total(&lines) >= Decimal::ZERO);
    }

    /// Totalization is order-independent
    #[test]
    fn prop_total_order_independent(
        mut lines in prop::collection::vec((1i32..100, price_strategy()), 2..8)
    ) {
        let forward = order_total(&lines);
        lines.reverse();
        prop_assert_eq!(order_total(&lines), forward);
    }

    /// Appending a line adds exactly that line's value
    #[test]
    fn prop_total_additive(
        lines in prop::collection::vec((1i32..100, price_strategy()), 0..8),
        extra_quantity in 1i32..100,
        extra_price in price_strategy(),
    ) {
        let base = order_total(&lines);
        let mut extended = lines.clone();
        extended.push((extra_quantity, extra_price));

        prop_assert_eq!(
            order_total(&extended),
            base + Decimal::from(extra_quantity) * extra_price
        );
    }
}
