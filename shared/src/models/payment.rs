//! Payment models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_date: DateTime<Utc>,
    /// Computed from the order's lines at creation when not supplied, then
    /// frozen; later line changes never alter it
    pub total_amount: Decimal,
    pub method: PaymentMethod,
    pub processed_by: Option<Uuid>,
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Cash,
    OnlineTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::OnlineTransfer => "online_transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "cash" => Some(PaymentMethod::Cash),
            "online_transfer" => Some(PaymentMethod::OnlineTransfer),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "Credit Card"),
            PaymentMethod::DebitCard => write!(f, "Debit Card"),
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::OnlineTransfer => write!(f, "Online Transfer"),
        }
    }
}
