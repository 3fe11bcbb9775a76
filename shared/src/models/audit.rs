//! Audit trail model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One append-only audit log entry, recorded after a successful mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// e.g. "create", "update", "delete", "restock"
    pub action: String,
    /// Entity kind the action touched, e.g. "order", "stock"
    pub entity: String,
    pub record_id: Uuid,
    pub user_id: Option<Uuid>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
