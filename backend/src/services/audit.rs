//! Audit trail service
//!
//! Append-only sink recording who did what after each successful mutation.
//! A failed audit write is logged and swallowed: the audit log never
//! influences a mutation's outcome.

use sqlx::PgPool;
use uuid::Uuid;

use shared::AuditEntry;

use crate::error::AppResult;

/// Audit trail service
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an audit entry for a committed mutation
    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: &str,
        entity: &str,
        record_id: Uuid,
        details: Option<String>,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_trail (action, entity, record_id, user_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(action)
        .bind(entity)
        .bind(record_id)
        .bind(user_id)
        .bind(&details)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                action,
                entity,
                %record_id,
                "failed to record audit entry: {}",
                e
            );
        }
    }

    /// Latest audit entries, newest first
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<
            _,
            (
                Uuid,
                String,
                String,
                Uuid,
                Option<Uuid>,
                Option<String>,
                chrono::DateTime<chrono::Utc>,
            ),
        >(
            r#"
            SELECT id, action, entity, record_id, user_id, details, created_at
            FROM audit_trail
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, action, entity, record_id, user_id, details, created_at)| AuditEntry {
                    id,
                    action,
                    entity,
                    record_id,
                    user_id,
                    details,
                    created_at,
                },
            )
            .collect())
    }
}
