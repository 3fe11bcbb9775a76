//! Reporting service for dashboards and analytics
//!
//! Pure read/query composition over the persisted state: every report is a
//! snapshot recomputed at request time, with no caching layer and no
//! incremental maintenance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{TimeBucket, ORDER_STATUS_PENDING, ORDER_STATUS_RETURNED};

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    fn range(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .start_date
            .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let end = self
            .end_date
            .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());
        (start, end)
    }
}

/// One point in a time-bucketed sales series
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesPoint {
    pub period: String,
    pub total_sales: Decimal,
}

/// Revenue per product (top sellers)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// Payments processed per employee
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmployeeSales {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub total_sales: Decimal,
}

/// Customer ranked by lifetime payments
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopCustomer {
    pub customer_id: Uuid,
    pub name: String,
    pub total_spent: Decimal,
}

/// Pending order without a payment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OutstandingOrder {
    pub order_id: Uuid,
    pub customer_name: String,
    pub status: String,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub order_value: Decimal,
}

/// Product with its derived total stock
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductStockLevel {
    pub id: Uuid,
    pub name: String,
    pub total_stock_quantity: i64,
}

/// Inventory valued at cost and at selling price
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockValuation {
    pub total_at_cost: Decimal,
    pub total_at_selling_price: Decimal,
}

/// Revenue, cost of goods sold, and profit
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    pub total_cogs: Decimal,
    pub total_profit: Decimal,
}

/// Product count per category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category_name: Option<String>,
    pub product_count: i64,
}

/// Recent order entry for dashboards
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecentOrder {
    pub id: Uuid,
    pub customer_name: String,
    pub status: String,
    pub order_date: chrono::DateTime<chrono::Utc>,
}

/// Admin dashboard overview
#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_payments: i64,
    pub total_stock_quantity: i64,
    pub total_inventory_value: Decimal,
    pub low_stock_threshold: i64,
    pub low_stock_products: Vec<ProductStockLevel>,
    pub monthly_sales: Vec<SalesPoint>,
    pub category_breakdown: Vec<CategoryCount>,
    pub recent_orders: Vec<RecentOrder>,
}

/// Employee dashboard overview
#[derive(Debug, Serialize)]
pub struct EmployeeDashboard {
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_payments: i64,
    pub pending_orders: i64,
    pub recent_orders: Vec<RecentOrder>,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Admin dashboard: inventory overview plus sales series
    pub async fn admin_dashboard(&self, low_stock_threshold: i64) -> AppResult<AdminDashboard> {
        let total_products =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
                .fetch_one(&self.db)
                .await?;

        let total_customers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
                .fetch_one(&self.db)
                .await?;

        let (total_orders, pending_orders) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = $1)
            FROM orders
            "#,
        )
        .bind(ORDER_STATUS_PENDING)
        .fetch_one(&self.db)
        .await?;

        let total_payments =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
                .fetch_one(&self.db)
                .await?;

        let total_stock_quantity = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0) FROM stocks",
        )
        .fetch_one(&self.db)
        .await?;

        let total_inventory_value = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(quantity * price_per_package), 0) FROM stocks",
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_products = self.low_stock_products(low_stock_threshold).await?;
        let monthly_sales = self
            .sales_over_time(TimeBucket::Month, &ReportFilter::default())
            .await?;
        let category_breakdown = self.category_breakdown().await?;
        let recent_orders = self.recent_orders(5).await?;

        Ok(AdminDashboard {
            total_products,
            total_customers,
            total_orders,
            pending_orders,
            total_payments,
            total_stock_quantity,
            total_inventory_value,
            low_stock_threshold,
            low_stock_products,
            monthly_sales,
            category_breakdown,
            recent_orders,
        })
    }

    /// Employee dashboard: day-to-day entry counts
    pub async fn employee_dashboard(&self) -> AppResult<EmployeeDashboard> {
        let total_customers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
                .fetch_one(&self.db)
                .await?;

        let (total_orders, pending_orders) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = $1)
            FROM orders
            "#,
        )
        .bind(ORDER_STATUS_PENDING)
        .fetch_one(&self.db)
        .await?;

        let total_payments =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
                .fetch_one(&self.db)
                .await?;

        let recent_orders = self.recent_orders(5).await?;

        Ok(EmployeeDashboard {
            total_customers,
            total_orders,
            total_payments,
            pending_orders,
            recent_orders,
        })
    }

    /// Payments bucketed by day/month/year within the requested window
    pub async fn sales_over_time(
        &self,
        bucket: TimeBucket,
        filter: &ReportFilter,
    ) -> AppResult<Vec<SalesPoint>> {
        let (start, end) = filter.range();

        // Bucket names come from TimeBucket, never from user input
        let query = format!(
            r#"
            SELECT TO_CHAR(DATE_TRUNC('{trunc}', payment_date), '{format}') AS period,
                   SUM(total_amount) AS total_sales
            FROM payments
            WHERE payment_date::date BETWEEN $1 AND $2
            GROUP BY DATE_TRUNC('{trunc}', payment_date)
            ORDER BY DATE_TRUNC('{trunc}', payment_date)
            "#,
            trunc = bucket.date_trunc(),
            format = bucket.label_format(),
        );

        let points = sqlx::query_as::<_, SalesPoint>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await?;

        Ok(points)
    }

    /// Top products by line revenue
    pub async fn sales_by_product(&self, limit: i64) -> AppResult<Vec<ProductSales>> {
        let sales = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name,
                   COALESCE(SUM(oi.quantity), 0) AS total_quantity,
                   COALESCE(SUM(oi.quantity * oi.price_each), 0) AS total_revenue
            FROM order_items oi
            JOIN stocks s ON s.id = oi.stock_id
            JOIN products p ON p.id = s.product_id
            GROUP BY p.id
            ORDER BY total_revenue DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Payments totalled per processing employee
    pub async fn sales_by_employee(&self) -> AppResult<Vec<EmployeeSales>> {
        let sales = sqlx::query_as::<_, EmployeeSales>(
            r#"
            SELECT u.id AS user_id, u.username, COALESCE(SUM(pay.total_amount), 0) AS total_sales
            FROM payments pay
            LEFT JOIN users u ON u.id = pay.processed_by
            GROUP BY u.id, u.username
            ORDER BY total_sales DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Customers ranked by lifetime payment totals
    pub async fn top_customers(&self, limit: i64) -> AppResult<Vec<TopCustomer>> {
        let customers = sqlx::query_as::<_, TopCustomer>(
            r#"
            SELECT c.id AS customer_id, c.name, SUM(pay.total_amount) AS total_spent
            FROM customers c
            JOIN orders o ON o.customer_id = c.id
            JOIN payments pay ON pay.order_id = o.id
            GROUP BY c.id
            ORDER BY total_spent DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Pending orders that have no payment yet, largest value first
    pub async fn outstanding_balances(&self) -> AppResult<Vec<OutstandingOrder>> {
        let orders = sqlx::query_as::<_, OutstandingOrder>(
            r#"
            SELECT o.id AS order_id, c.name AS customer_name, o.status, o.order_date,
                   COALESCE(SUM(oi.quantity * oi.price_each), 0) AS order_value
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            WHERE o.status = $1
              AND NOT EXISTS (SELECT 1 FROM payments pay WHERE pay.order_id = o.id)
            GROUP BY o.id, c.name
            ORDER BY order_value DESC
            "#,
        )
        .bind(ORDER_STATUS_PENDING)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Products whose derived total stock is under the threshold.
    /// A product with no stock records counts as zero.
    pub async fn low_stock_products(&self, threshold: i64) -> AppResult<Vec<ProductStockLevel>> {
        let products = sqlx::query_as::<_, ProductStockLevel>(
            r#"
            SELECT p.id, p.name, COALESCE(SUM(s.quantity), 0) AS total_stock_quantity
            FROM products p
            LEFT JOIN stocks s ON s.product_id = p.id
            GROUP BY p.id
            HAVING COALESCE(SUM(s.quantity), 0) < $1
            ORDER BY total_stock_quantity, p.name
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Products with no order line inside the trailing window
    pub async fn dead_stock_products(&self, window_days: i64) -> AppResult<Vec<ProductStockLevel>> {
        let products = sqlx::query_as::<_, ProductStockLevel>(
            r#"
            SELECT p.id, p.name, COALESCE(SUM(s.quantity), 0) AS total_stock_quantity
            FROM products p
            LEFT JOIN stocks s ON s.product_id = p.id
            WHERE NOT EXISTS (
                SELECT 1
                FROM order_items oi
                JOIN stocks s2 ON s2.id = oi.stock_id
                JOIN orders o ON o.id = oi.order_id
                WHERE s2.product_id = p.id
                  AND o.order_date >= NOW() - make_interval(days => $1)
            )
            GROUP BY p.id
            ORDER BY p.name
            "#,
        )
        .bind(window_days as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Current inventory valued at cost and at selling price
    pub async fn stock_valuation(&self) -> AppResult<StockValuation> {
        let valuation = sqlx::query_as::<_, StockValuation>(
            r#"
            SELECT COALESCE(SUM(s.quantity * p.cost_price), 0) AS total_at_cost,
                   COALESCE(SUM(s.quantity * p.selling_price), 0) AS total_at_selling_price
            FROM stocks s
            JOIN products p ON p.id = s.product_id
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(valuation)
    }

    /// Revenue, COGS, and profit across all time
    pub async fn financial_summary(&self) -> AppResult<FinancialSummary> {
        let total_revenue = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM payments",
        )
        .fetch_one(&self.db)
        .await?;

        let total_cogs = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(oi.quantity * p.cost_price), 0)
            FROM order_items oi
            JOIN stocks s ON s.id = oi.stock_id
            JOIN products p ON p.id = s.product_id
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(FinancialSummary {
            total_revenue,
            total_cogs,
            total_profit: total_revenue - total_cogs,
        })
    }

    /// Orders marked returned, newest first
    pub async fn returned_orders(&self) -> AppResult<Vec<RecentOrder>> {
        let orders = sqlx::query_as::<_, RecentOrder>(
            r#"
            SELECT o.id, c.name AS customer_name, o.status, o.order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.status = $1
            ORDER BY o.order_date DESC
            "#,
        )
        .bind(ORDER_STATUS_RETURNED)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Product count per category
    async fn category_breakdown(&self) -> AppResult<Vec<CategoryCount>> {
        let counts = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT cat.name AS category_name, COUNT(p.id) AS product_count
            FROM products p
            LEFT JOIN categories cat ON cat.id = p.category_id
            GROUP BY cat.name
            ORDER BY product_count DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(counts)
    }

    /// Latest orders for the dashboard activity feed
    async fn recent_orders(&self, limit: i64) -> AppResult<Vec<RecentOrder>> {
        let orders = sqlx::query_as::<_, RecentOrder>(
            r#"
            SELECT o.id, c.name AS customer_name, o.status, o.order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            ORDER BY o.order_date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
