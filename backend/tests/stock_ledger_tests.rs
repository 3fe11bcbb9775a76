//! Stock ledger tests
//!
//! Tests for the ledger quantity math:
//! - No negative stock: any deduction past zero is rejected whole
//! - All-or-nothing: a rejected adjustment leaves the quantity untouched
//! - Returns always succeed

use proptest::prelude::*;
use shared::ledger::{apply_adjustment, LedgerError};

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_deduction_reduces_quantity() {
    assert_eq!(apply_adjustment(10, -3), Ok(7));
}

#[test]
fn test_deduction_to_exactly_zero() {
    assert_eq!(apply_adjustment(3, -3), Ok(0));
}

#[test]
fn test_return_increases_quantity() {
    assert_eq!(apply_adjustment(7, 3), Ok(10));
}

#[test]
fn test_zero_delta_is_identity() {
    assert_eq!(apply_adjustment(42, 0), Ok(42));
}

#[test]
fn test_overdraw_rejected_with_context() {
    let result = apply_adjustment(2, -5);
    assert_eq!(
        result,
        Err(LedgerError::InsufficientStock {
            available: 2,
            requested: 5,
        })
    );
}

#[test]
fn test_overdraw_from_empty_stock() {
    assert!(apply_adjustment(0, -1).is_err());
}

#[test]
fn test_return_to_empty_stock() {
    assert_eq!(apply_adjustment(0, 5), Ok(5));
}

/// Stock(quantity=2), order line of 5: rejected, stock unchanged
#[test]
fn test_insufficient_stock_scenario() {
    let on_hand = 2;
    let result = apply_adjustment(on_hand, -5);
    assert!(result.is_err());
    // Caller persists nothing on Err; on-hand stays 2
    assert_eq!(on_hand, 2);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Quantity after a successful adjustment is never negative
    #[test]
    fn prop_no_negative_stock(
        on_hand in 0i32..10_000,
        delta in -10_000i32..10_000,
    ) {
        if let Ok(new_quantity) = apply_adjustment(on_hand, delta) {
            prop_assert!(new_quantity >= 0);
            prop_assert_eq!(new_quantity, on_hand + delta);
        } else {
            // Rejected exactly when the deduction exceeds on-hand
            prop_assert!(delta < 0 && on_hand + delta < 0);
        }
    }

    /// Positive deltas (returns) always succeed
    #[test]
    fn prop_returns_always_succeed(
        on_hand in 0i32..10_000,
        delta in 0i32..10_000,
    ) {
        prop_assert_eq!(apply_adjustment(on_hand, delta), Ok(on_hand + delta));
    }

    /// Deduct-then-return round trip restores the original quantity
    #[test]
    fn prop_deduct_return_round_trip(
        on_hand in 0i32..10_000,
        amount in 0i32..10_000,
    ) {
        if let Ok(after_deduct) = apply_adjustment(on_hand, -amount) {
            let restored = apply_adjustment(after_deduct, amount).unwrap();
            prop_assert_eq!(restored, on_hand);
        }
    }

    /// A deduction succeeds iff enough stock is on hand
    #[test]
    fn prop_deduction_boundary(
        on_hand in 0i32..1_000,
        amount in 1i32..1_000,
    ) {
        let result = apply_adjustment(on_hand, -amount);
        if amount <= on_hand {
            prop_assert_eq!(result, Ok(on_hand - amount));
        } else {
            prop_assert!(result.is_err());
        }
    }
}
