//! Order and order line models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status is free-form; these are the values the platform itself
/// assigns or that reports key on.
pub const ORDER_STATUS_PENDING: &str = "Pending";
pub const ORDER_STATUS_RETURNED: &str = "Returned";

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub created_by: Option<Uuid>,
    /// Set once at creation, immutable thereafter
    pub order_date: DateTime<Utc>,
}

/// One line of an order
///
/// References a [`crate::Stock`] record, not a product: pricing and stock
/// deduction happen at the package-type granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub stock_id: Uuid,
    pub quantity: i32,
    /// Frozen at creation; later stock price changes never alter it
    pub price_each: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price_each
    }
}
