//! Product, category and stock models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A wholesale product
///
/// Stock is held per package type in [`Stock`] records; a product's total
/// on-hand quantity is always derived from those, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub selling_price: Decimal,
    /// Unit cost basis used for COGS and stock valuation
    pub cost_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The unit of sale granularity for a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    SixPack,
    Dozen,
    Carton,
    Bulk,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::SixPack => "six_pack",
            PackageType::Dozen => "dozen",
            PackageType::Carton => "carton",
            PackageType::Bulk => "bulk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "six_pack" => Some(PackageType::SixPack),
            "dozen" => Some(PackageType::Dozen),
            "carton" => Some(PackageType::Carton),
            "bulk" => Some(PackageType::Bulk),
            _ => None,
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageType::SixPack => write!(f, "6-Pack"),
            PackageType::Dozen => write!(f, "Dozen"),
            PackageType::Carton => write!(f, "Carton"),
            PackageType::Bulk => write!(f, "Bulk"),
        }
    }
}

/// On-hand stock for one product/package-type combination
///
/// `quantity` is the number of packages on hand and is mutated only by the
/// stock ledger (order-line reconciliation) or a direct restock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub package_type: PackageType,
    pub quantity: i32,
    pub price_per_package: Decimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stock {
    /// Revenue expected if every on-hand package sells at the current price
    pub fn expected_total_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price_per_package
    }
}
