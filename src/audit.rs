use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Appends an entry to `audit_logs` for a write made by `user_id`.
///
/// Runs after the write itself has committed, so a failure is only logged.
pub async fn record(pool: &DbPool, user_id: Uuid, action: &str, resource: &str, metadata: Value) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, action, resource, "audit log write failed");
    }
}
