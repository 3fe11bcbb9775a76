//! HTTP handlers for order management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::order::{
    AddItemInput, CreateOrderInput, OrderDetail, OrderService, OrderSummary, SaveOrderInput,
    UpdateItemInput,
};
use crate::AppState;

/// List orders
pub async fn list_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Create an order with its lines in one transaction
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.create_order(current_user.0.user_id, input).await?;
    Ok(Json(order))
}

/// Batch save an order and its full desired line set (admin)
pub async fn save_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<SaveOrderInput>,
) -> AppResult<Json<OrderDetail>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service
        .save_order(current_user.0.user_id, order_id, input)
        .await?;
    Ok(Json(order))
}

/// Delete an order, returning all line quantities to stock (admin)
pub async fn delete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    service.delete_order(current_user.0.user_id, order_id).await?;
    Ok(Json(()))
}

/// Add a line to an order
pub async fn add_order_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<AddItemInput>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service
        .add_item(current_user.0.user_id, order_id, input)
        .await?;
    Ok(Json(order))
}

/// Update a line (admin)
pub async fn update_order_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<OrderDetail>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service
        .update_item(current_user.0.user_id, order_id, item_id, input)
        .await?;
    Ok(Json(order))
}

/// Remove a line, returning its quantity to stock (admin)
pub async fn remove_order_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<OrderDetail>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service
        .remove_item(current_user.0.user_id, order_id, item_id)
        .await?;
    Ok(Json(order))
}
