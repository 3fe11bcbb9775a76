//! HTTP handlers for stock management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::Stock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ledger::StockLedger;
use crate::services::stock::{
    CreateStockInput, RestockInput, StockService, StockSummary, UpdateStockInput,
};
use crate::AppState;

/// List stock records (admin)
pub async fn list_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockSummary>>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let stock = service.list_stock().await?;
    Ok(Json(stock))
}

/// Get a stock record (admin)
pub async fn get_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<Stock>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let stock = service.get_stock(stock_id).await?;
    Ok(Json(stock))
}

/// Current on-hand quantity for a stock record
pub async fn get_stock_availability(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<i32>> {
    let quantity = StockLedger::available_quantity(&state.db, stock_id).await?;
    Ok(Json(quantity))
}

/// Create a stock record (admin)
pub async fn create_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStockInput>,
) -> AppResult<Json<Stock>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let stock = service.create_stock(current_user.0.user_id, input).await?;
    Ok(Json(stock))
}

/// Update price/availability/package type (admin)
pub async fn update_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<UpdateStockInput>,
) -> AppResult<Json<Stock>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let stock = service
        .update_stock(current_user.0.user_id, stock_id, input)
        .await?;
    Ok(Json(stock))
}

/// Manual restock (admin)
pub async fn restock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<RestockInput>,
) -> AppResult<Json<Stock>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    let stock = service
        .restock(current_user.0.user_id, stock_id, input)
        .await?;
    Ok(Json(stock))
}

/// Delete a stock record (admin)
pub async fn delete_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = StockService::new(state.db);
    service
        .delete_stock(current_user.0.user_id, stock_id)
        .await?;
    Ok(Json(()))
}
