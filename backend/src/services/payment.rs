//! Payment service and totalizer
//!
//! A payment's total is computed once from its order's lines when no
//! explicit amount is supplied, then frozen: later line changes never alter
//! a captured payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_amount, Payment, PaymentMethod};

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;

/// Payment service
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// Input for capturing a payment
#[derive(Debug, Deserialize)]
pub struct CreatePaymentInput {
    pub order_id: Uuid,
    pub method: PaymentMethod,
    /// Computed from the order's lines when omitted
    pub total_amount: Option<Decimal>,
}

/// Input for updating a payment; the frozen total is not editable
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentInput {
    pub method: Option<PaymentMethod>,
}

/// Payment list entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentSummary {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_name: String,
    pub payment_date: chrono::DateTime<chrono::Utc>,
    pub total_amount: Decimal,
    pub method: String,
    pub processed_by: Option<Uuid>,
}

/// Line on a payment receipt
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReceiptLine {
    pub product_name: String,
    pub package_type: String,
    pub quantity: i32,
    pub price_each: Decimal,
    pub line_total: Decimal,
}

/// A payment with the order context needed to render a receipt
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub customer_name: String,
    pub order_status: String,
    pub items: Vec<ReceiptLine>,
}

/// Row shape for payments
#[derive(Debug, FromRow)]
struct PaymentRow {
    id: Uuid,
    order_id: Uuid,
    payment_date: chrono::DateTime<chrono::Utc>,
    total_amount: Decimal,
    method: String,
    processed_by: Option<Uuid>,
}

impl PaymentRow {
    fn into_payment(self) -> AppResult<Payment> {
        let method = PaymentMethod::parse(&self.method)
            .ok_or_else(|| AppError::Internal(format!("Unknown payment method: {}", self.method)))?;
        Ok(Payment {
            id: self.id,
            order_id: self.order_id,
            payment_date: self.payment_date,
            total_amount: self.total_amount,
            method,
            processed_by: self.processed_by,
        })
    }
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Sum of quantity × price_each over an order's current lines
    pub async fn compute_total(&self, order_id: Uuid) -> AppResult<Decimal> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(quantity * price_each), 0) FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }

    /// Capture a payment against an order.
    ///
    /// When no explicit total is supplied it is computed from the order's
    /// lines at this moment and frozen on the payment row.
    pub async fn create_payment(
        &self,
        user_id: Uuid,
        input: CreatePaymentInput,
    ) -> AppResult<Payment> {
        let order_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)",
        )
        .bind(input.order_id)
        .fetch_one(&self.db)
        .await?;

        if !order_exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let total_amount = match input.total_amount {
            Some(total) => {
                validate_amount(total).map_err(|msg| AppError::Validation {
                    field: "total_amount".to_string(),
                    message: msg.to_string(),
                })?;
                total
            }
            None => self.compute_total(input.order_id).await?,
        };

        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (order_id, total_amount, method, processed_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, payment_date, total_amount, method, processed_by
            "#,
        )
        .bind(input.order_id)
        .bind(total_amount)
        .bind(input.method.as_str())
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let payment = row.into_payment()?;

        AuditService::new(self.db.clone())
            .record(
                Some(user_id),
                "create",
                "payment",
                payment.id,
                Some(format!("total {}", payment.total_amount)),
            )
            .await;

        Ok(payment)
    }

    /// Get a payment by id
    pub async fn get_payment(&self, payment_id: Uuid) -> AppResult<Payment> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, order_id, payment_date, total_amount, method, processed_by
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        row.into_payment()
    }

    /// List payments, newest first
    pub async fn list_payments(&self) -> AppResult<Vec<PaymentSummary>> {
        let payments = sqlx::query_as::<_, PaymentSummary>(
            r#"
            SELECT pay.id, pay.order_id, c.name AS customer_name, pay.payment_date,
                   pay.total_amount, pay.method, pay.processed_by
            FROM payments pay
            JOIN orders o ON o.id = pay.order_id
            JOIN customers c ON c.id = o.customer_id
            ORDER BY pay.payment_date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(payments)
    }

    /// Update a payment's method; the captured total stays frozen
    pub async fn update_payment(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
        input: UpdatePaymentInput,
    ) -> AppResult<Payment> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments
            SET method = COALESCE($1, method)
            WHERE id = $2
            RETURNING id, order_id, payment_date, total_amount, method, processed_by
            "#,
        )
        .bind(input.method.map(|m| m.as_str()))
        .bind(payment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        let payment = row.into_payment()?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "payment", payment_id, None)
            .await;

        Ok(payment)
    }

    /// Delete a payment
    pub async fn delete_payment(&self, user_id: Uuid, payment_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(payment_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "payment", payment_id, None)
            .await;

        Ok(())
    }

    /// Get a payment with the order context needed for a receipt
    pub async fn get_receipt(&self, payment_id: Uuid) -> AppResult<PaymentReceipt> {
        let payment = self.get_payment(payment_id).await?;

        let (customer_name, order_status) = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT c.name, o.status
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(payment.order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let items = sqlx::query_as::<_, ReceiptLine>(
            r#"
            SELECT p.name AS product_name, s.package_type, oi.quantity, oi.price_each,
                   (oi.quantity * oi.price_each) AS line_total
            FROM order_items oi
            JOIN stocks s ON s.id = oi.stock_id
            JOIN products p ON p.id = s.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.seq
            "#,
        )
        .bind(payment.order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PaymentReceipt {
            payment,
            customer_name,
            order_status,
            items,
        })
    }
}
