//! Stock ledger decision core
//!
//! Pure quantity math for the stock ledger and the order-line reconciler.
//! The backend applies these decisions inside database transactions; nothing
//! here performs I/O, which keeps the all-or-nothing contract testable in
//! isolation.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors from ledger quantity math
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A deduction would drive the on-hand quantity negative
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },
}

/// Apply a signed adjustment to an on-hand package count.
///
/// Positive deltas return stock, negative deltas deduct. Returns the new
/// quantity, or `InsufficientStock` when the deduction exceeds what is on
/// hand. The caller persists the result only on `Ok`.
pub fn apply_adjustment(on_hand: i32, delta: i32) -> Result<i32, LedgerError> {
    let next = on_hand + delta;
    if next < 0 {
        return Err(LedgerError::InsufficientStock {
            available: on_hand,
            requested: -delta,
        });
    }
    Ok(next)
}

/// The committed state of an order line, as seen by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    pub stock_id: Uuid,
    pub quantity: i32,
}

impl LineState {
    pub fn new(stock_id: Uuid, quantity: i32) -> Self {
        Self { stock_id, quantity }
    }
}

/// A single stock mutation the reconciler wants applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub stock_id: Uuid,
    /// Positive = return to stock, negative = deduct
    pub delta: i32,
}

/// Translate an order line's state transition into stock adjustments.
///
/// `before` is the committed line (None when creating), `after` the desired
/// line (None when deleting). When the line moves between stock records the
/// old stock receives a full return and the new stock a full deduction;
/// delta math only applies while the stock reference is unchanged.
pub fn line_adjustments(
    before: Option<LineState>,
    after: Option<LineState>,
) -> Vec<StockAdjustment> {
    match (before, after) {
        // Create: deduct the full quantity
        (None, Some(new)) => vec![StockAdjustment {
            stock_id: new.stock_id,
            delta: -new.quantity,
        }],
        // Delete: return the full quantity
        (Some(old), None) => vec![StockAdjustment {
            stock_id: old.stock_id,
            delta: old.quantity,
        }],
        (Some(old), Some(new)) => {
            if old.stock_id != new.stock_id {
                // Reassigned to another stock record: full return, then
                // full deduction
                vec![
                    StockAdjustment {
                        stock_id: old.stock_id,
                        delta: old.quantity,
                    },
                    StockAdjustment {
                        stock_id: new.stock_id,
                        delta: -new.quantity,
                    },
                ]
            } else {
                let delta = new.quantity - old.quantity;
                if delta == 0 {
                    Vec::new()
                } else {
                    vec![StockAdjustment {
                        stock_id: old.stock_id,
                        delta: -delta,
                    }]
                }
            }
        }
        (None, None) => Vec::new(),
    }
}

/// Sum an order's line totals: Σ quantity × price_each
pub fn order_total(lines: &[(i32, Decimal)]) -> Decimal {
    lines
        .iter()
        .map(|(quantity, price_each)| Decimal::from(*quantity) * price_each)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deduction_within_stock() {
        assert_eq!(apply_adjustment(10, -3), Ok(7));
    }

    #[test]
    fn test_deduction_to_zero() {
        assert_eq!(apply_adjustment(5, -5), Ok(0));
    }

    #[test]
    fn test_deduction_past_zero_rejected() {
        assert_eq!(
            apply_adjustment(2, -5),
            Err(LedgerError::InsufficientStock {
                available: 2,
                requested: 5,
            })
        );
    }

    #[test]
    fn test_return_increases_stock() {
        assert_eq!(apply_adjustment(7, 3), Ok(10));
    }

    #[test]
    fn test_create_deducts_full_quantity() {
        let stock = Uuid::new_v4();
        let adjustments = line_adjustments(None, Some(LineState::new(stock, 3)));
        assert_eq!(
            adjustments,
            vec![StockAdjustment {
                stock_id: stock,
                delta: -3,
            }]
        );
    }

    #[test]
    fn test_update_same_stock_uses_delta() {
        let stock = Uuid::new_v4();
        let adjustments = line_adjustments(
            Some(LineState::new(stock, 3)),
            Some(LineState::new(stock, 5)),
        );
        assert_eq!(
            adjustments,
            vec![StockAdjustment {
                stock_id: stock,
                delta: -2,
            }]
        );
    }

    #[test]
    fn test_update_reduced_quantity_returns_stock() {
        let stock = Uuid::new_v4();
        let adjustments = line_adjustments(
            Some(LineState::new(stock, 5)),
            Some(LineState::new(stock, 2)),
        );
        assert_eq!(
            adjustments,
            vec![StockAdjustment {
                stock_id: stock,
                delta: 3,
            }]
        );
    }

    #[test]
    fn test_update_unchanged_is_noop() {
        let stock = Uuid::new_v4();
        let adjustments = line_adjustments(
            Some(LineState::new(stock, 4)),
            Some(LineState::new(stock, 4)),
        );
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_update_across_stocks_returns_then_deducts() {
        let old_stock = Uuid::new_v4();
        let new_stock = Uuid::new_v4();
        let adjustments = line_adjustments(
            Some(LineState::new(old_stock, 3)),
            Some(LineState::new(new_stock, 5)),
        );
        assert_eq!(
            adjustments,
            vec![
                StockAdjustment {
                    stock_id: old_stock,
                    delta: 3,
                },
                StockAdjustment {
                    stock_id: new_stock,
                    delta: -5,
                },
            ]
        );
    }

    #[test]
    fn test_delete_returns_full_quantity() {
        let stock = Uuid::new_v4();
        let adjustments = line_adjustments(Some(LineState::new(stock, 3)), None);
        assert_eq!(
            adjustments,
            vec![StockAdjustment {
                stock_id: stock,
                delta: 3,
            }]
        );
    }

    #[test]
    fn test_order_total() {
        let lines = [(2, dec("3.00")), (1, dec("7.00"))];
        assert_eq!(order_total(&lines), dec("13.00"));
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
