//! Reporting engine tests
//!
//! Tests for the derived aggregates: low-stock and dead-stock
//! classification, stock valuation, COGS/profit arithmetic, and the
//! time-bucket formats used by the sales series.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::TimeBucket;
use std::str::FromStr;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Low-stock rule: flagged when total stock is strictly below the threshold
fn is_low_stock(total_stock: i64, threshold: i64) -> bool {
    total_stock < threshold
}

/// Dead-stock rule: flagged when the last sale is older than the window
/// (or the product never sold)
fn is_dead_stock(days_since_last_sale: Option<i64>, window_days: i64) -> bool {
    match days_since_last_sale {
        Some(days) => days > window_days,
        None => true,
    }
}

// ============================================================================
// Low-Stock Detection
// ============================================================================

#[test]
fn test_low_stock_below_threshold() {
    assert!(is_low_stock(9, 10));
}

#[test]
fn test_low_stock_at_threshold_not_flagged() {
    // Strictly-below comparison: exactly at the threshold is fine
    assert!(!is_low_stock(10, 10));
}

#[test]
fn test_low_stock_zero_quantity() {
    // Products with no stock records aggregate to zero and are flagged
    assert!(is_low_stock(0, 10));
}

// ============================================================================
// Dead-Stock Detection
// ============================================================================

#[test]
fn test_dead_stock_outside_window() {
    assert!(is_dead_stock(Some(181), 180));
}

#[test]
fn test_dead_stock_inside_window_not_flagged() {
    assert!(!is_dead_stock(Some(30), 180));
}

#[test]
fn test_dead_stock_never_sold() {
    assert!(is_dead_stock(None, 180));
}

// ============================================================================
// Financial Aggregates
// ============================================================================

#[test]
fn test_profit_is_revenue_minus_cogs() {
    let revenue = dec("1000.00");
    let cogs = dec("650.00");
    assert_eq!(revenue - cogs, dec("350.00"));
}

#[test]
fn test_cogs_uses_cost_basis_not_sale_price() {
    // Line: 4 packages sold at 12.00 each, cost basis 7.50 per package
    let quantity = Decimal::from(4);
    let price_each = dec("12.00");
    let cost_price = dec("7.50");

    let revenue = quantity * price_each;
    let cogs = quantity * cost_price;

    assert_eq!(revenue, dec("48.00"));
    assert_eq!(cogs, dec("30.00"));
    assert_eq!(revenue - cogs, dec("18.00"));
}

#[test]
fn test_negative_profit_when_selling_under_cost() {
    let revenue = dec("100.00");
    let cogs = dec("120.00");
    assert_eq!(revenue - cogs, dec("-20.00"));
}

#[test]
fn test_stock_valuation_both_bases() {
    // 20 packages, cost 3.00, selling 5.00
    let quantity = Decimal::from(20);
    assert_eq!(quantity * dec("3.00"), dec("60.00"));
    assert_eq!(quantity * dec("5.00"), dec("100.00"));
}

#[test]
fn test_expected_revenue_uses_package_price() {
    // total_expected_revenue is quantity x price_per_package per stock record
    let stocks = [(10, dec("4.00")), (3, dec("15.00"))];
    let expected: Decimal = stocks
        .iter()
        .map(|(quantity, price)| Decimal::from(*quantity) * price)
        .sum();
    assert_eq!(expected, dec("85.00"));
}

// ============================================================================
// Time Buckets
// ============================================================================

#[test]
fn test_bucket_date_trunc_fields() {
    assert_eq!(TimeBucket::Day.date_trunc(), "day");
    assert_eq!(TimeBucket::Month.date_trunc(), "month");
    assert_eq!(TimeBucket::Year.date_trunc(), "year");
}

#[test]
fn test_bucket_label_formats() {
    assert_eq!(TimeBucket::Day.label_format(), "YYYY-MM-DD");
    assert_eq!(TimeBucket::Month.label_format(), "Mon YYYY");
    assert_eq!(TimeBucket::Year.label_format(), "YYYY");
}

#[test]
fn test_bucket_default_is_month() {
    assert_eq!(TimeBucket::default(), TimeBucket::Month);
}

#[test]
fn test_bucket_deserializes_lowercase() {
    let bucket: TimeBucket = serde_json::from_str("\"day\"").unwrap();
    assert_eq!(bucket, TimeBucket::Day);
    let bucket: TimeBucket = serde_json::from_str("\"year\"").unwrap();
    assert_eq!(bucket, TimeBucket::Year);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Low-stock classification is monotonic in the threshold
    #[test]
    fn prop_low_stock_monotonic(
        total_stock in 0i64..1_000,
        threshold in 1i64..1_000,
        extra in 1i64..100,
    ) {
        if is_low_stock(total_stock, threshold) {
            prop_assert!(is_low_stock(total_stock, threshold + extra));
        }
    }

    /// Revenue decomposes exactly into profit plus COGS
    #[test]
    fn prop_revenue_decomposes(
        revenue in amount_strategy(),
        cogs in amount_strategy(),
    ) {
        let profit = revenue - cogs;
        prop_assert_eq!(profit + cogs, revenue);
    }

    /// Valuation at selling price is never below valuation at cost when
    /// every product has a margin
    #[test]
    fn prop_valuation_ordering_with_margin(
        quantities in prop::collection::vec(0i32..500, 1..10),
        costs in prop::collection::vec(amount_strategy(), 1..10),
        margins in prop::collection::vec(amount_strategy(), 1..10),
    ) {
        let len = quantities.len().min(costs.len()).min(margins.len());

        let at_cost: Decimal = (0..len)
            .map(|i| Decimal::from(quantities[i]) * costs[i])
            .sum();
        let at_selling: Decimal = (0..len)
            .map(|i| Decimal::from(quantities[i]) * (costs[i] + margins[i]))
            .sum();

        prop_assert!(at_selling >= at_cost);
    }
}
