//! HTTP handlers for the audit trail

use axum::{extract::State, Json};
use shared::AuditEntry;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::audit::AuditService;
use crate::AppState;

/// Latest audit entries (admin)
pub async fn list_audit_trail(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AuditEntry>>> {
    current_user.0.require_admin()?;
    let service = AuditService::new(state.db);
    let entries = service.list_recent(50).await?;
    Ok(Json(entries))
}
