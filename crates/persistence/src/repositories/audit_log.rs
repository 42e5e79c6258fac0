//! Device audit log repository.
//!
//! Append and read only.

use domain::models::NewAuditEntry;
use sqlx::{PgConnection, PgPool};

use crate::entities::{DeviceAuditLogEntity, DeviceHistoryEntity};
use crate::metrics::QueryTimer;

/// Repository for device audit log operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Creates a new AuditLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one entry on the caller's connection.
    pub async fn append(
        conn: &mut PgConnection,
        entry: &NewAuditEntry,
    ) -> Result<DeviceAuditLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("append_device_audit_log");
        let result = sqlx::query_as::<_, DeviceAuditLogEntity>(
            r#"
            INSERT INTO device_audit_logs (device_id, action, old_value, new_value, note, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, device_id, action, old_value, new_value, note, created_by, created_at
            "#,
        )
        .bind(entry.device_id)
        .bind(entry.action.as_str())
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(&entry.note)
        .bind(entry.created_by)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// History of one device, newest first, with the author's display name.
    pub async fn list_for_device(
        &self,
        device_id: i64,
    ) -> Result<Vec<DeviceHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_device_audit_logs");
        let result = sqlx::query_as::<_, DeviceHistoryEntity>(
            r#"
            SELECT l.id, l.device_id, l.action, l.old_value, l.new_value, l.note,
                   l.created_by, l.created_at, u.full_name AS created_by_name
            FROM device_audit_logs l
            LEFT JOIN users u ON u.id = l.created_by
            WHERE l.device_id = $1
            ORDER BY l.id DESC
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
