//! Stock record service
//!
//! Inventory management for the per-package-type stock records. Quantity is
//! only written here through an explicit restock; order-driven mutations go
//! through the stock ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_amount, validate_stock_quantity, PackageType, Stock};

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;
use crate::services::product::StockRow;

/// Stock service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Input for creating a stock record
#[derive(Debug, Deserialize)]
pub struct CreateStockInput {
    pub product_id: Uuid,
    pub package_type: PackageType,
    pub quantity: i32,
    pub price_per_package: Decimal,
    pub is_available: Option<bool>,
}

/// Input for updating a stock record's price or availability.
/// Quantity is deliberately absent; use restock for that.
#[derive(Debug, Deserialize)]
pub struct UpdateStockInput {
    pub package_type: Option<PackageType>,
    pub price_per_package: Option<Decimal>,
    pub is_available: Option<bool>,
}

/// Input for a manual restock (absolute on-hand count)
#[derive(Debug, Deserialize)]
pub struct RestockInput {
    pub quantity: i32,
}

/// Stock list entry with product context
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockSummary {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub package_type: String,
    pub quantity: i32,
    pub price_per_package: Decimal,
    pub is_available: bool,
    pub expected_total_amount: Decimal,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List stock records ordered by product name
    pub async fn list_stock(&self) -> AppResult<Vec<StockSummary>> {
        let stock = sqlx::query_as::<_, StockSummary>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name, s.package_type, s.quantity,
                   s.price_per_package, s.is_available,
                   (s.quantity * s.price_per_package) AS expected_total_amount
            FROM stocks s
            JOIN products p ON p.id = s.product_id
            ORDER BY p.name, s.package_type
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(stock)
    }

    /// Get a stock record by id
    pub async fn get_stock(&self, stock_id: Uuid) -> AppResult<Stock> {
        let row = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, product_id, package_type, quantity, price_per_package, is_available,
                   created_at, updated_at
            FROM stocks
            WHERE id = $1
            "#,
        )
        .bind(stock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        row.into_stock()
    }

    /// Create a stock record
    pub async fn create_stock(&self, user_id: Uuid, input: CreateStockInput) -> AppResult<Stock> {
        validate_stock_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.price_per_package).map_err(|msg| AppError::Validation {
            field: "price_per_package".to_string(),
            message: msg.to_string(),
        })?;

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let stock_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stocks (product_id, package_type, quantity, price_per_package, is_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.package_type.as_str())
        .bind(input.quantity)
        .bind(input.price_per_package)
        .bind(input.is_available.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "create", "stock", stock_id, None)
            .await;

        self.get_stock(stock_id).await
    }

    /// Update price, availability or package type.
    ///
    /// Price changes never touch existing order lines; their price_each was
    /// frozen at creation.
    pub async fn update_stock(
        &self,
        user_id: Uuid,
        stock_id: Uuid,
        input: UpdateStockInput,
    ) -> AppResult<Stock> {
        if let Some(price) = input.price_per_package {
            validate_amount(price).map_err(|msg| AppError::Validation {
                field: "price_per_package".to_string(),
                message: msg.to_string(),
            })?;
        }

        let result = sqlx::query(
            r#"
            UPDATE stocks
            SET package_type = COALESCE($1, package_type),
                price_per_package = COALESCE($2, price_per_package),
                is_available = COALESCE($3, is_available),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(input.package_type.map(|p| p.as_str()))
        .bind(input.price_per_package)
        .bind(input.is_available)
        .bind(stock_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "stock", stock_id, None)
            .await;

        self.get_stock(stock_id).await
    }

    /// Manual restock: set the absolute on-hand count
    pub async fn restock(
        &self,
        user_id: Uuid,
        stock_id: Uuid,
        input: RestockInput,
    ) -> AppResult<Stock> {
        validate_stock_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let result = sqlx::query(
            "UPDATE stocks SET quantity = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(input.quantity)
        .bind(stock_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(
                Some(user_id),
                "restock",
                "stock",
                stock_id,
                Some(format!("quantity set to {}", input.quantity)),
            )
            .await;

        self.get_stock(stock_id).await
    }

    /// Delete a stock record; rejected while any order line references it
    pub async fn delete_stock(&self, user_id: Uuid, stock_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM order_items WHERE stock_id = $1)",
        )
        .bind(stock_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::ReferentialIntegrity(
                "Stock record is referenced by order items".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM stocks WHERE id = $1")
            .bind(stock_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "stock", stock_id, None)
            .await;

        Ok(())
    }
}
