//! Product and category service
//!
//! Catalogue CRUD plus the per-product stock aggregates (total on-hand
//! packages and expected revenue, both derived from stock records).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_amount, validate_name, Category, PackageType, Stock};

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub selling_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Product list entry with derived stock aggregates
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub category_name: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub total_stock_quantity: i64,
    pub total_expected_revenue: Decimal,
}

/// A product with its stock records and derived aggregates
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub total_stock_quantity: i64,
    pub total_expected_revenue: Decimal,
    pub stock_items: Vec<Stock>,
}

/// Row shape for stock records
#[derive(Debug, FromRow)]
pub(crate) struct StockRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub package_type: String,
    pub quantity: i32,
    pub price_per_package: Decimal,
    pub is_available: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StockRow {
    pub(crate) fn into_stock(self) -> AppResult<Stock> {
        let package_type = PackageType::parse(&self.package_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown package type: {}", self.package_type))
        })?;
        Ok(Stock {
            id: self.id,
            product_id: self.product_id,
            package_type,
            quantity: self.quantity,
            price_per_package: self.price_per_package,
            is_available: self.is_available,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products with their stock aggregates
    pub async fn list_products(&self) -> AppResult<Vec<ProductSummary>> {
        let products = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT p.id, p.name, cat.name AS category_name, p.selling_price, p.cost_price,
                   COALESCE(SUM(s.quantity), 0) AS total_stock_quantity,
                   COALESCE(SUM(s.quantity * s.price_per_package), 0) AS total_expected_revenue
            FROM products p
            LEFT JOIN categories cat ON cat.id = p.category_id
            LEFT JOIN stocks s ON s.product_id = p.id
            GROUP BY p.id, cat.name
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product with its stock records
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductDetail> {
        let row = sqlx::query_as::<
            _,
            (
                Uuid,
                String,
                Option<String>,
                Option<Uuid>,
                Option<String>,
                Decimal,
                Decimal,
            ),
        >(
            r#"
            SELECT p.id, p.name, p.description, p.category_id, cat.name, p.selling_price,
                   p.cost_price
            FROM products p
            LEFT JOIN categories cat ON cat.id = p.category_id
            WHERE p.id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let stock_rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, product_id, package_type, quantity, price_per_package, is_available,
                   created_at, updated_at
            FROM stocks
            WHERE product_id = $1
            ORDER BY package_type
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let stock_items = stock_rows
            .into_iter()
            .map(StockRow::into_stock)
            .collect::<AppResult<Vec<_>>>()?;

        let total_stock_quantity = stock_items.iter().map(|s| s.quantity as i64).sum();
        let total_expected_revenue = stock_items
            .iter()
            .map(Stock::expected_total_amount)
            .sum::<Decimal>();

        Ok(ProductDetail {
            id: row.0,
            name: row.1,
            description: row.2,
            category_id: row.3,
            category_name: row.4,
            selling_price: row.5,
            cost_price: row.6,
            total_stock_quantity,
            total_expected_revenue,
            stock_items,
        })
    }

    /// Create a product
    pub async fn create_product(
        &self,
        user_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<ProductDetail> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.selling_price).map_err(|msg| AppError::Validation {
            field: "selling_price".to_string(),
            message: msg.to_string(),
        })?;
        validate_amount(input.cost_price).map_err(|msg| AppError::Validation {
            field: "cost_price".to_string(),
            message: msg.to_string(),
        })?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        if let Some(category_id) = input.category_id {
            let category_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        let product_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (name, description, category_id, selling_price, cost_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(input.selling_price)
        .bind(input.cost_price)
        .fetch_one(&self.db)
        .await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "create", "product", product_id, None)
            .await;

        self.get_product(product_id).await
    }

    /// Update a product
    pub async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<ProductDetail> {
        if let Some(name) = &input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;

            let name_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1 AND id <> $2)",
            )
            .bind(name)
            .bind(product_id)
            .fetch_one(&self.db)
            .await?;

            if name_taken {
                return Err(AppError::DuplicateEntry("name".to_string()));
            }
        }

        for (field, amount) in [
            ("selling_price", input.selling_price),
            ("cost_price", input.cost_price),
        ] {
            if let Some(amount) = amount {
                validate_amount(amount).map_err(|msg| AppError::Validation {
                    field: field.to_string(),
                    message: msg.to_string(),
                })?;
            }
        }

        if let Some(category_id) = input.category_id {
            let category_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                category_id = COALESCE($3, category_id),
                selling_price = COALESCE($4, selling_price),
                cost_price = COALESCE($5, cost_price),
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(input.selling_price)
        .bind(input.cost_price)
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "product", product_id, None)
            .await;

        self.get_product(product_id).await
    }

    /// Delete a product.
    ///
    /// Rejected while any order line references the product's stock; the
    /// stock records themselves cascade with the product.
    pub async fn delete_product(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM order_items oi
                JOIN stocks s ON s.id = oi.stock_id
                WHERE s.product_id = $1
            )
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::ReferentialIntegrity(
                "Product stock is referenced by order items".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "product", product_id, None)
            .await;

        Ok(())
    }

    /// List categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories
            .into_iter()
            .map(|(id, name, description)| Category {
                id,
                name,
                description,
            })
            .collect())
    }

    /// Create a category
    pub async fn create_category(
        &self,
        user_id: Uuid,
        input: CreateCategoryInput,
    ) -> AppResult<Category> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let category_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "create", "category", category_id, None)
            .await;

        Ok(Category {
            id: category_id,
            name: input.name,
            description: input.description,
        })
    }

    /// Delete a category; products keep working with their category unset
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "category", category_id, None)
            .await;

        Ok(())
    }
}
