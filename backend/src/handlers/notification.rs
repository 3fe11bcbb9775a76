//! HTTP handlers for the in-app notification feed

use axum::{
    extract::{Path, State},
    Json,
};
use shared::Notification;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::notification::NotificationService;
use crate::AppState;

/// Latest unread notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let notifications = service.list_unread(10).await?;
    Ok(Json(notifications))
}

/// Mark one notification read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = NotificationService::new(state.db);
    service.mark_read(notification_id).await?;
    Ok(Json(()))
}

/// Mark every unread notification read
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<u64>> {
    let service = NotificationService::new(state.db);
    let marked = service.mark_all_read().await?;
    Ok(Json(marked))
}

/// Run the low-stock scan and create feed entries
pub async fn trigger_low_stock_scan(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let created = service
        .scan_low_stock(state.config.reports.low_stock_threshold)
        .await?;
    Ok(Json(created))
}
