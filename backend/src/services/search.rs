//! Cross-entity dashboard search

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Search service
#[derive(Clone)]
pub struct SearchService {
    db: PgPool,
}

/// One search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// "product", "customer" or "order"
    pub kind: String,
    pub id: Uuid,
    pub label: String,
}

impl SearchService {
    /// Create a new SearchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Search products (name/description), customers (name/email) and
    /// orders (customer name) with one case-insensitive query.
    pub async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", query);

        let mut results = Vec::new();

        let products = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, name FROM products
            WHERE name ILIKE $1 OR description ILIKE $1
            ORDER BY name
            LIMIT 20
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.db)
        .await?;

        for (id, name) in products {
            results.push(SearchResult {
                kind: "product".to_string(),
                id,
                label: name,
            });
        }

        let customers = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, name FROM customers
            WHERE name ILIKE $1 OR email ILIKE $1
            ORDER BY name
            LIMIT 20
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.db)
        .await?;

        for (id, name) in customers {
            results.push(SearchResult {
                kind: "customer".to_string(),
                id,
                label: name,
            });
        }

        let orders = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT o.id, c.name
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE c.name ILIKE $1
            ORDER BY o.order_date DESC
            LIMIT 20
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.db)
        .await?;

        for (id, customer_name) in orders {
            results.push(SearchResult {
                kind: "order".to_string(),
                id,
                label: format!("Order for {}", customer_name),
            });
        }

        Ok(results)
    }
}
