use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{entity::audit_logs, error::AppResult};

pub async fn log_audit<C: ConnectionTrait>(
    conn: &C,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(())
}

/// Record an audit event, logging instead of failing when the write fails.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(conn, user_id, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
