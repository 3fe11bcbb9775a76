//! Customer service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::{validate_email, validate_name, Customer};

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn customer_from_row(row: (Uuid, String, String, Option<String>, Option<String>)) -> Customer {
    Customer {
        id: row.0,
        name: row.1,
        email: row.2,
        phone: row.3,
        address: row.4,
    }
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List customers ordered by name
    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, Option<String>, Option<String>)>(
            "SELECT id, name, email, phone, address FROM customers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(customer_from_row).collect())
    }

    /// Get a customer by id
    pub async fn get_customer(&self, customer_id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, (Uuid, String, String, Option<String>, Option<String>)>(
            "SELECT id, name, email, phone, address FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer_from_row(row))
    }

    /// Create a customer
    pub async fn create_customer(
        &self,
        user_id: Uuid,
        input: CreateCustomerInput,
    ) -> AppResult<Customer> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if email_taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let customer_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO customers (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        AuditService::new(self.db.clone())
            .record(Some(user_id), "create", "customer", customer_id, None)
            .await;

        self.get_customer(customer_id).await
    }

    /// Update a customer
    pub async fn update_customer(
        &self,
        user_id: Uuid,
        customer_id: Uuid,
        input: UpdateCustomerInput,
    ) -> AppResult<Customer> {
        if let Some(name) = &input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;

            let email_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1 AND id <> $2)",
            )
            .bind(email)
            .bind(customer_id)
            .fetch_one(&self.db)
            .await?;

            if email_taken {
                return Err(AppError::DuplicateEntry("email".to_string()));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address)
            WHERE id = $5
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(customer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "update", "customer", customer_id, None)
            .await;

        self.get_customer(customer_id).await
    }

    /// Delete a customer.
    ///
    /// Rejected while the customer has orders: cascade-deleting them would
    /// drop order lines without returning their stock.
    pub async fn delete_customer(&self, user_id: Uuid, customer_id: Uuid) -> AppResult<()> {
        let has_orders = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if has_orders {
            return Err(AppError::ReferentialIntegrity(
                "Customer has existing orders".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        AuditService::new(self.db.clone())
            .record(Some(user_id), "delete", "customer", customer_id, None)
            .await;

        Ok(())
    }
}
