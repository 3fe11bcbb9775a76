//! In-app notification service
//!
//! Read-only consumer of ledger state: the low-stock scan turns products
//! under the configured threshold into notification feed entries. Delivery
//! beyond the in-app feed is out of scope.

use sqlx::PgPool;
use uuid::Uuid;

use shared::Notification;

use crate::error::{AppError, AppResult};

/// Notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

/// Row for the low-stock scan
#[derive(Debug, sqlx::FromRow)]
struct LowStockRow {
    id: Uuid,
    name: String,
    total_stock_quantity: i64,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Scan for products under the low-stock threshold and write one
    /// notification per product that does not already have an unread one.
    /// Returns the notifications created by this scan.
    pub async fn scan_low_stock(&self, threshold: i64) -> AppResult<Vec<Notification>> {
        let low_stock = sqlx::query_as::<_, LowStockRow>(
            r#"
            SELECT p.id, p.name, COALESCE(SUM(s.quantity), 0) AS total_stock_quantity
            FROM products p
            LEFT JOIN stocks s ON s.product_id = p.id
            GROUP BY p.id
            HAVING COALESCE(SUM(s.quantity), 0) < $1
            ORDER BY p.name
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.db)
        .await?;

        let mut created = Vec::new();
        for row in low_stock {
            let message = format!(
                "Product '{}' is low on stock (only {} left).",
                row.name, row.total_stock_quantity
            );

            // One unread alert per product at a time
            let already_pending = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM notifications WHERE message = $1 AND is_read = FALSE)",
            )
            .bind(&message)
            .fetch_one(&self.db)
            .await?;

            if already_pending {
                continue;
            }

            let notification = sqlx::query_as::<_, (Uuid, String, bool, chrono::DateTime<chrono::Utc>)>(
                r#"
                INSERT INTO notifications (message)
                VALUES ($1)
                RETURNING id, message, is_read, created_at
                "#,
            )
            .bind(&message)
            .fetch_one(&self.db)
            .await?;

            tracing::info!(product = %row.id, "low-stock notification created");

            created.push(Notification {
                id: notification.0,
                message: notification.1,
                is_read: notification.2,
                created_at: notification.3,
            });
        }

        Ok(created)
    }

    /// Latest unread notifications, newest first
    pub async fn list_unread(&self, limit: i64) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, (Uuid, String, bool, chrono::DateTime<chrono::Utc>)>(
            r#"
            SELECT id, message, is_read, created_at
            FROM notifications
            WHERE is_read = FALSE
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, message, is_read, created_at)| Notification {
                id,
                message,
                is_read,
                created_at,
            })
            .collect())
    }

    /// Mark one notification read
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(notification_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }

        Ok(())
    }

    /// Mark every unread notification read
    pub async fn mark_all_read(&self) -> AppResult<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE is_read = FALSE")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
