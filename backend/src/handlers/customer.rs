//! HTTP handlers for customer management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::Customer;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::customer::{CreateCustomerInput, CustomerService, UpdateCustomerInput};
use crate::AppState;

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list_customers().await?;
    Ok(Json(customers))
}

/// Get a customer
pub async fn get_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.get_customer(customer_id).await?;
    Ok(Json(customer))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service
        .create_customer(current_user.0.user_id, input)
        .await?;
    Ok(Json(customer))
}

/// Update a customer (admin)
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Customer>> {
    current_user.0.require_admin()?;
    let service = CustomerService::new(state.db);
    let customer = service
        .update_customer(current_user.0.user_id, customer_id, input)
        .await?;
    Ok(Json(customer))
}

/// Delete a customer (admin)
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = CustomerService::new(state.db);
    service
        .delete_customer(current_user.0.user_id, customer_id)
        .await?;
    Ok(Json(()))
}
