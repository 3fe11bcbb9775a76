//! Stock ledger service
//!
//! Owns the authoritative on-hand quantity per stock record. All quantity
//! mutations from the order path go through [`StockLedger::adjust`], which
//! runs inside the caller's transaction so an order save and its stock
//! adjustments commit or roll back as one unit.

use shared::ledger::{apply_adjustment, LedgerError};
use shared::PackageType;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// The persistent stock ledger
pub struct StockLedger;

impl StockLedger {
    /// Current on-hand package count for a stock record
    pub async fn available_quantity(db: &PgPool, stock_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT quantity FROM stocks WHERE id = $1")
            .bind(stock_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock".to_string()))
    }

    /// Apply a signed adjustment to a stock record's quantity.
    ///
    /// Positive deltas return stock, negative deltas deduct. The row is
    /// locked before the check-then-write, so two concurrent deductions
    /// cannot both pass the insufficient-stock check against a stale read.
    /// Returns the new quantity; on `InsufficientStock` nothing is written.
    pub async fn adjust(conn: &mut PgConnection, stock_id: Uuid, delta: i32) -> AppResult<i32> {
        let (quantity, product_name, package_type) = sqlx::query_as::<_, (i32, String, String)>(
            r#"
            SELECT s.quantity, p.name, s.package_type
            FROM stocks s
            JOIN products p ON p.id = s.product_id
            WHERE s.id = $1
            FOR UPDATE OF s
            "#,
        )
        .bind(stock_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let new_quantity = apply_adjustment(quantity, delta).map_err(|e| match e {
            LedgerError::InsufficientStock {
                available,
                requested,
            } => AppError::InsufficientStock {
                product: product_name,
                package_type: PackageType::parse(&package_type)
                    .map(|p| p.to_string())
                    .unwrap_or(package_type),
                available,
                requested,
            },
        })?;

        sqlx::query("UPDATE stocks SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_quantity)
            .bind(stock_id)
            .execute(&mut *conn)
            .await?;

        Ok(new_quantity)
    }
}
