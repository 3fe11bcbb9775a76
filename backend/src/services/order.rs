//! Order service and order-line reconciler
//!
//! Keeps stock quantities consistent with the set of order lines that
//! reference them. Every line create/update/delete is translated into
//! stock-ledger adjustments applied inside the same transaction as the line
//! write, so an order save and its stock effects commit or roll back as one
//! unit. This service is the only writer of stock quantities on the order
//! path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use shared::ledger::{line_adjustments, order_total, LineState};
use shared::{validate_amount, validate_line_quantity, ORDER_STATUS_PENDING};

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;
use crate::services::ledger::StockLedger;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// One desired order line in a create or batch save
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    /// Present when the line already exists; absent lines are created and
    /// existing lines missing from the batch are removed
    pub id: Option<Uuid>,
    pub stock_id: Uuid,
    pub quantity: i32,
    /// Frozen from the stock's current price when not supplied
    pub price_each: Option<Decimal>,
}

/// Input for creating an order together with its lines
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: Uuid,
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Input for the batch order save: order fields plus the full desired line set
#[derive(Debug, Deserialize)]
pub struct SaveOrderInput {
    pub customer_id: Option<Uuid>,
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Input for adding a single line to an existing order
#[derive(Debug, Deserialize)]
pub struct AddItemInput {
    pub stock_id: Uuid,
    pub quantity: i32,
    pub price_each: Option<Decimal>,
}

/// Input for updating a single line
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub stock_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub price_each: Option<Decimal>,
}

/// Order list entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub status: String,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub item_count: i64,
    pub order_value: Decimal,
}

/// A fully resolved order line
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLine {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub product_name: String,
    pub package_type: String,
    pub quantity: i32,
    pub price_each: Decimal,
    pub line_total: Decimal,
}

/// An order with its lines and running total
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order and all of its lines in one transaction.
    ///
    /// Any insufficient-stock failure aborts the whole save: no order row,
    /// no lines, no stock change.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        input: CreateOrderInput,
    ) -> AppResult<OrderDetail> {
        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(input.customer_id)
        .fetch_one(&self.db)
        .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let status = input
            .status
            .unwrap_or_else(|| ORDER_STATUS_PENDING.to_string());

        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (customer_id, status, created_by)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(&status)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            Self::create_line(&mut tx, order_id, item).await?;
        }

        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(
                Some(user_id),
                "create",
                "order",
                order_id,
                Some(format!("{} line(s)", input.items.len())),
            )
            .await;

        self.get_order(order_id).await
    }

    /// Batch save: update order fields and reconcile the full line set.
    ///
    /// Lines carrying an id are updated, lines without one are created, and
    /// committed lines missing from the input are removed (stock returned).
    /// All reconciliations run in one transaction; either all succeed or the
    /// order-level save is rejected.
    pub async fn save_order(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        input: SaveOrderInput,
    ) -> AppResult<OrderDetail> {
        let order_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        if !order_exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        if let Some(customer_id) = input.customer_id {
            let customer_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
            )
            .bind(customer_id)
            .fetch_one(&self.db)
            .await?;

            if !customer_exists {
                return Err(AppError::NotFound("Customer".to_string()));
            }
        }

        let committed: HashMap<Uuid, LineState> = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            "SELECT id, stock_id, quantity FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, stock_id, quantity)| (id, LineState::new(stock_id, quantity)))
        .collect();

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            UPDATE orders
            SET customer_id = COALESCE($1, customer_id),
                status = COALESCE($2, status)
            WHERE id = $3
            "#,
        )
        .bind(input.customer_id)
        .bind(&input.status)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        // Remove dropped lines first so their returned stock is visible to
        // the updates and creations in the same batch
        let kept: HashSet<Uuid> = input.items.iter().filter_map(|item| item.id).collect();
        for (line_id, state) in &committed {
            if !kept.contains(line_id) {
                Self::delete_line(&mut tx, *line_id, *state).await?;
            }
        }

        for item in &input.items {
            match item.id {
                Some(line_id) => {
                    let before = committed
                        .get(&line_id)
                        .copied()
                        .ok_or_else(|| AppError::NotFound("Order item".to_string()))?;
                    Self::update_line(&mut tx, line_id, before, item).await?;
                }
                None => {
                    Self::create_line(&mut tx, order_id, item).await?;
                }
            }
        }

        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "order", order_id, None)
            .await;

        self.get_order(order_id).await
    }

    /// Add a single line to an existing order
    pub async fn add_item(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        input: AddItemInput,
    ) -> AppResult<OrderDetail> {
        let order_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        if !order_exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let item = OrderItemInput {
            id: None,
            stock_id: input.stock_id,
            quantity: input.quantity,
            price_each: input.price_each,
        };

        let mut tx = self.db.begin().await?;
        let item_id = Self::create_line(&mut tx, order_id, &item).await?;
        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "create", "order_item", item_id, None)
            .await;

        self.get_order(order_id).await
    }

    /// Update a single line (quantity change and/or stock reassignment)
    pub async fn update_item(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<OrderDetail> {
        let existing = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT stock_id, quantity FROM order_items WHERE id = $1 AND order_id = $2",
        )
        .bind(item_id)
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order item".to_string()))?;

        let before = LineState::new(existing.0, existing.1);
        let desired = OrderItemInput {
            id: Some(item_id),
            stock_id: input.stock_id.unwrap_or(existing.0),
            quantity: input.quantity.unwrap_or(existing.1),
            price_each: input.price_each,
        };

        let mut tx = self.db.begin().await?;
        Self::update_line(&mut tx, item_id, before, &desired).await?;
        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "order_item", item_id, None)
            .await;

        self.get_order(order_id).await
    }

    /// Remove a single line, returning its full quantity to stock.
    ///
    /// The line delete and the stock return are one atomic unit; if the
    /// ledger write fails the delete fails with it.
    pub async fn remove_item(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<OrderDetail> {
        let existing = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT stock_id, quantity FROM order_items WHERE id = $1 AND order_id = $2",
        )
        .bind(item_id)
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order item".to_string()))?;

        let mut tx = self.db.begin().await?;
        Self::delete_line(&mut tx, item_id, LineState::new(existing.0, existing.1)).await?;
        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "order_item", item_id, None)
            .await;

        self.get_order(order_id).await
    }

    /// Delete an order, returning every line's quantity to stock in one
    /// transaction
    pub async fn delete_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<()> {
        let lines = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            "SELECT id, stock_id, quantity FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let order_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        if !order_exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let mut tx = self.db.begin().await?;

        for (line_id, stock_id, quantity) in lines {
            Self::delete_line(&mut tx, line_id, LineState::new(stock_id, quantity)).await?;
        }

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "order", order_id, None)
            .await;

        Ok(())
    }

    /// List orders, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.customer_id, c.name AS customer_name, o.status, o.order_date,
                   COUNT(oi.id) AS item_count,
                   COALESCE(SUM(oi.quantity * oi.price_each), 0) AS order_value
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY o.id, c.name
            ORDER BY o.order_date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Get an order with its lines in insertion order
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderDetail> {
        let order = sqlx::query_as::<_, (Uuid, Uuid, String, String, Option<Uuid>, chrono::DateTime<chrono::Utc>)>(
            r#"
            SELECT o.id, o.customer_id, c.name, o.status, o.created_by, o.order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let items = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT oi.id, oi.stock_id, p.name AS product_name, s.package_type,
                   oi.quantity, oi.price_each,
                   (oi.quantity * oi.price_each) AS line_total
            FROM order_items oi
            JOIN stocks s ON s.id = oi.stock_id
            JOIN products p ON p.id = s.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.seq
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let total = order_total(
            &items
                .iter()
                .map(|line| (line.quantity, line.price_each))
                .collect::<Vec<_>>(),
        );

        Ok(OrderDetail {
            id: order.0,
            customer_id: order.1,
            customer_name: order.2,
            status: order.3,
            created_by: order.4,
            order_date: order.5,
            items,
            total,
        })
    }

    /// Create a line: freeze the price, deduct stock, insert the row.
    /// Runs inside the caller's transaction.
    async fn create_line(
        conn: &mut PgConnection,
        order_id: Uuid,
        item: &OrderItemInput,
    ) -> AppResult<Uuid> {
        validate_line_quantity(item.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let (stock_price, is_available) = sqlx::query_as::<_, (Decimal, bool)>(
            "SELECT price_per_package, is_available FROM stocks WHERE id = $1",
        )
        .bind(item.stock_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        if !is_available {
            return Err(AppError::Validation {
                field: "stock_id".to_string(),
                message: "Stock record is not available for sale".to_string(),
            });
        }

        let price_each = match item.price_each {
            Some(price) => {
                validate_amount(price).map_err(|msg| AppError::Validation {
                    field: "price_each".to_string(),
                    message: msg.to_string(),
                })?;
                price
            }
            None => stock_price,
        };

        StockLedger::adjust(conn, item.stock_id, -item.quantity).await?;

        let item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO order_items (order_id, stock_id, quantity, price_each)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(item.stock_id)
        .bind(item.quantity)
        .bind(price_each)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item_id)
    }

    /// Update a line. Same-stock changes apply the quantity delta; a stock
    /// reassignment is a full return to the old stock plus a full deduction
    /// from the new one. price_each stays frozen unless the stock changes
    /// (re-frozen from the new stock) or an explicit price is supplied.
    async fn update_line(
        conn: &mut PgConnection,
        line_id: Uuid,
        before: LineState,
        item: &OrderItemInput,
    ) -> AppResult<()> {
        validate_line_quantity(item.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        if let Some(price) = item.price_each {
            validate_amount(price).map_err(|msg| AppError::Validation {
                field: "price_each".to_string(),
                message: msg.to_string(),
            })?;
        }

        let stock_changed = before.stock_id != item.stock_id;
        let price_override = if stock_changed {
            let (stock_price, is_available) = sqlx::query_as::<_, (Decimal, bool)>(
                "SELECT price_per_package, is_available FROM stocks WHERE id = $1",
            )
            .bind(item.stock_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

            if !is_available {
                return Err(AppError::Validation {
                    field: "stock_id".to_string(),
                    message: "Stock record is not available for sale".to_string(),
                });
            }

            Some(item.price_each.unwrap_or(stock_price))
        } else {
            item.price_each
        };

        let after = LineState::new(item.stock_id, item.quantity);
        for adjustment in line_adjustments(Some(before), Some(after)) {
            StockLedger::adjust(conn, adjustment.stock_id, adjustment.delta).await?;
        }

        sqlx::query(
            r#"
            UPDATE order_items
            SET stock_id = $1, quantity = $2, price_each = COALESCE($3, price_each)
            WHERE id = $4
            "#,
        )
        .bind(item.stock_id)
        .bind(item.quantity)
        .bind(price_override)
        .bind(line_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete a line, returning its full quantity to stock.
    async fn delete_line(
        conn: &mut PgConnection,
        line_id: Uuid,
        before: LineState,
    ) -> AppResult<()> {
        for adjustment in line_adjustments(Some(before), None) {
            StockLedger::adjust(conn, adjustment.stock_id, adjustment.delta).await?;
        }

        sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(line_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
