//! HTTP handlers for payment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::Payment;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::payment::{
    CreatePaymentInput, PaymentReceipt, PaymentService, PaymentSummary, UpdatePaymentInput,
};
use crate::AppState;

/// List payments
pub async fn list_payments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PaymentSummary>>> {
    let service = PaymentService::new(state.db);
    let payments = service.list_payments().await?;
    Ok(Json(payments))
}

/// Get a payment
pub async fn get_payment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    let service = PaymentService::new(state.db);
    let payment = service.get_payment(payment_id).await?;
    Ok(Json(payment))
}

/// Capture a payment; total computed from the order when omitted
pub async fn create_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePaymentInput>,
) -> AppResult<Json<Payment>> {
    let service = PaymentService::new(state.db);
    let payment = service
        .create_payment(current_user.0.user_id, input)
        .await?;
    Ok(Json(payment))
}

/// Update a payment's method (admin)
pub async fn update_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
    Json(input): Json<UpdatePaymentInput>,
) -> AppResult<Json<Payment>> {
    current_user.0.require_admin()?;
    let service = PaymentService::new(state.db);
    let payment = service
        .update_payment(current_user.0.user_id, payment_id, input)
        .await?;
    Ok(Json(payment))
}

/// Delete a payment (admin)
pub async fn delete_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = PaymentService::new(state.db);
    service
        .delete_payment(current_user.0.user_id, payment_id)
        .await?;
    Ok(Json(()))
}

/// Payment with order context for receipt rendering
pub async fn get_payment_receipt(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<PaymentReceipt>> {
    let service = PaymentService::new(state.db);
    let receipt = service.get_receipt(payment_id).await?;
    Ok(Json(receipt))
}
