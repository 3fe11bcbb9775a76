//! HTTP handlers for product and category endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::Category;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{
    CreateCategoryInput, CreateProductInput, ProductDetail, ProductService, ProductSummary,
    UpdateProductInput,
};
use crate::AppState;

/// List products with stock aggregates
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a product with its stock records
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Create a product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<ProductDetail>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    let product = service.create_product(current_user.0.user_id, input).await?;
    Ok(Json(product))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<ProductDetail>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    let product = service
        .update_product(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Delete a product (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    service
        .delete_product(current_user.0.user_id, product_id)
        .await?;
    Ok(Json(()))
}

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = ProductService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a category (admin)
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<Json<Category>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    let category = service
        .create_category(current_user.0.user_id, input)
        .await?;
    Ok(Json(category))
}

/// Delete a category (admin)
pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    service
        .delete_category(current_user.0.user_id, category_id)
        .await?;
    Ok(Json(()))
}
